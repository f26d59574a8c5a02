//! # Service Layer
//!
//! - `MessageAuthenticator`: sign/verify with an already-resolved secret
//! - `LazyAuthenticator`: first-use initialization from a `SecretSource`

mod authenticator;
mod lazy;

pub use authenticator::MessageAuthenticator;
pub use lazy::LazyAuthenticator;

//! # IPC Auth
//!
//! Shared-secret message authentication between two trusted processes
//! (a frontend and a backend).
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure protocol types, no I/O
//!   - `Envelope`: signed message as carried on the wire
//!   - `canonical_json`: deterministic encoding fed to the HMAC
//!   - `AuthenticatorConfig`: secret plus freshness windows
//!   - `SecretKey`: zeroize-on-drop key wrapper
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `TimeSource`: wall clock
//!   - `SecretSource`: where the secret comes from
//!
//! - **Service Layer** (`service/`):
//!   - `MessageAuthenticator`: `sign`, `verify`, `wrap`, `unwrap`
//!   - `LazyAuthenticator`: loads the secret on first use, exactly once
//!
//! - `ReplayGuard`: optional cache rejecting exact re-deliveries
//!
//! ## Security Properties
//!
//! - **HMAC-SHA256** over canonical JSON (keys sorted byte-wise)
//! - **Timestamp bound inside the signed message**; cannot be swapped
//! - **Two-sided freshness window**: `replay_window_secs` into the past,
//!   `clock_skew_tolerance_secs` into the future
//! - **Constant-time comparison** of the fixed-length digest
//! - Tampering and wrong-secret failures are indistinguishable
//!
//! Integrity and freshness only; payloads are not encrypted.
//!
//! ## Usage Example
//!
//! ```ignore
//! use ipc_auth::{AuthenticatorConfigBuilder, MessageAuthenticator};
//! use serde_json::json;
//!
//! let config = AuthenticatorConfigBuilder::new().secret("s3cret").build()?;
//! let auth = MessageAuthenticator::new(config)?;
//!
//! let payload = json!({"action": "ping"}).as_object().cloned().unwrap();
//! let wire = auth.wrap(payload)?;
//!
//! let received = auth.unwrap(&wire)?;
//! assert_eq!(received["action"], "ping");
//! ```

pub mod domain;
pub mod error;
pub mod ports;
pub mod replay_guard;
pub mod service;

// Re-exports for convenience
pub use domain::{
    canonical_json, AuthenticatorConfig, AuthenticatorConfigBuilder, Envelope, Payload,
    SecretKey, TIMESTAMP_FIELD,
};
pub use error::{AuthError, ConfigError, SignError, UnwrapError, VerifyError};
pub use ports::{
    EnvSecretSource, FixedTimeSource, SecretSource, StaticSecretSource, SystemTimeSource,
    TimeSource, Timestamp,
};
pub use replay_guard::ReplayGuard;
pub use service::{LazyAuthenticator, MessageAuthenticator};

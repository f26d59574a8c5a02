//! # Domain Layer
//!
//! Pure protocol types: canonical encoding, envelope shape, configuration
//! and the secret wrapper. No I/O.

pub mod canonical;
pub mod config;
pub mod envelope;
pub mod secret;

pub use canonical::{canonical_json, canonical_value};
pub use config::{
    AuthenticatorConfig, AuthenticatorConfigBuilder, DEFAULT_CLOCK_SKEW_TOLERANCE_SECS,
    DEFAULT_REPLAY_WINDOW_SECS,
};
pub use envelope::{Envelope, Payload, SIGNATURE_HEX_LEN, TIMESTAMP_FIELD};
pub use secret::SecretKey;

//! # Ports
//!
//! Driven ports (outbound dependencies) for the authenticator, plus the
//! default in-process adapters.

pub mod outbound;

pub use outbound::{
    EnvSecretSource, FixedTimeSource, SecretSource, StaticSecretSource, SystemTimeSource,
    TimeSource, Timestamp, DEFAULT_SECRET_ENV,
};

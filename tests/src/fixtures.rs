//! # Shared Fixtures

use ipc_auth::{
    AuthenticatorConfigBuilder, FixedTimeSource, MessageAuthenticator, Payload, Timestamp,
};
use serde_json::Value;
use std::sync::Arc;

/// Frozen "now" used across the suite (2001-09-09T01:46:40Z).
pub const NOW: Timestamp = 1_000_000_000;

/// Authenticator reading time from a shared frozen clock.
pub type FrozenAuthenticator = MessageAuthenticator<Arc<FixedTimeSource>>;

/// Authenticator with default windows on a clock frozen at [`NOW`].
pub fn frozen(secret: &str) -> (FrozenAuthenticator, Arc<FixedTimeSource>) {
    let clock = Arc::new(FixedTimeSource::new(NOW));
    (frozen_on(secret, Arc::clone(&clock)), clock)
}

/// Authenticator with default windows on the given clock.
pub fn frozen_on(secret: &str, clock: Arc<FixedTimeSource>) -> FrozenAuthenticator {
    let config = AuthenticatorConfigBuilder::new()
        .secret(secret)
        .build()
        .expect("valid config");
    MessageAuthenticator::with_time_source(config, clock).expect("authenticator")
}

/// Object payload from a `json!` literal.
pub fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        other => panic!("payload must be an object, got {other}"),
    }
}

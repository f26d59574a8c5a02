//! # Error Types
//!
//! One enum per operation family. Every variant is local and terminal: retry
//! policy, if any, belongs to the caller.

use thiserror::Error;

/// The authenticator cannot be built because the secret or a setting is unusable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The secret source has nothing to offer.
    #[error("Shared secret not available: set {source_name}")]
    MissingSecret { source_name: String },

    /// The secret source returned zero bytes.
    #[error("Shared secret is empty")]
    EmptySecret,

    /// The HMAC implementation refused the key.
    #[error("Shared secret rejected as HMAC key")]
    InvalidKey,

    /// A replay window of zero would reject every message.
    #[error("Replay window must be greater than zero")]
    ZeroReplayWindow,

    /// A numeric override could not be parsed.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidSetting { key: String, value: String },
}

/// Errors raised by `sign`. Both indicate programmer or deployment error.
#[derive(Debug, Error)]
pub enum SignError {
    /// The caller supplied a field the protocol injects itself.
    #[error("Field '{field}' is reserved and must not be supplied by the caller")]
    ReservedField { field: &'static str },

    /// The value handed to `sign_value` is not a JSON object.
    #[error("Payload must serialize to a JSON object, got {found}")]
    InvalidPayload { found: &'static str },

    /// The payload could not be turned into JSON at all.
    #[error("Payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reasons a received envelope is rejected.
///
/// Callers must treat every variant the same way (drop the message); the
/// distinction exists for diagnostics only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerifyError {
    /// `message` or `signature` is missing or has the wrong shape.
    #[error("Malformed envelope: {reason}")]
    MalformedEnvelope { reason: &'static str },

    /// `message.timestamp` is absent or not an integer.
    #[error("Message timestamp missing or not an integer")]
    MissingTimestamp,

    /// The message is older than the replay window.
    #[error("Message expired: age={age_secs}s, window={window_secs}s")]
    MessageExpired { age_secs: i64, window_secs: u64 },

    /// The message is further in the future than the skew tolerance allows.
    #[error("Message timestamp in future: ahead={ahead_secs}s, tolerance={tolerance_secs}s")]
    TimestampInFuture { ahead_secs: i64, tolerance_secs: u64 },

    /// Signature mismatch. Covers tampering and wrong-secret alike.
    #[error("Invalid signature")]
    InvalidSignature,

    /// An identical envelope was already accepted inside the freshness window.
    #[error("Envelope already accepted (replay)")]
    Replayed,

    /// The replay guard is full of live entries and cannot vouch for the
    /// envelope; it is refused rather than admitted unrecorded.
    #[error("Replay guard full: {capacity} live entries")]
    ReplayCacheFull { capacity: usize },
}

impl VerifyError {
    /// Stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedEnvelope { .. } => "malformed_envelope",
            Self::MissingTimestamp => "missing_timestamp",
            Self::MessageExpired { .. } => "message_expired",
            Self::TimestampInFuture { .. } => "timestamp_in_future",
            Self::InvalidSignature => "invalid_signature",
            Self::Replayed => "replayed",
            Self::ReplayCacheFull { .. } => "replay_cache_full",
        }
    }
}

/// Errors raised by `unwrap` on a transport string.
#[derive(Debug, Error)]
pub enum UnwrapError {
    /// The transport string is not valid JSON.
    #[error("Envelope decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The envelope decoded but failed verification.
    #[error(transparent)]
    Verify(#[from] VerifyError),
}

impl UnwrapError {
    /// Stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "envelope_decode",
            Self::Verify(e) => e.kind(),
        }
    }
}

/// Any failure from an authenticator that may still be unconfigured.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sign(#[from] SignError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Unwrap(#[from] UnwrapError),
}

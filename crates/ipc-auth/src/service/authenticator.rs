//! # Message Authenticator
//!
//! Signs outgoing payloads and verifies incoming envelopes.
//!
//! ## Verification Steps (in order)
//!
//! 1. **Shape**: `message` and `signature` present, signature is 64 lowercase hex
//! 2. **Timestamp**: `message.timestamp` present and integral
//! 3. **Freshness**: not older than the replay window, not further ahead than
//!    the skew tolerance
//! 4. **Signature**: HMAC-SHA256 over the canonical message, compared in
//!    constant time
//!
//! Each failing step is terminal. `verify` never panics on hostile input.

use crate::domain::canonical::canonical_json;
use crate::domain::envelope::{decode_signature, SIGNATURE_LEN};
use crate::domain::{AuthenticatorConfig, Envelope, Payload, TIMESTAMP_FIELD};
use crate::error::{ConfigError, SignError, UnwrapError, VerifyError};
use crate::ports::{SystemTimeSource, TimeSource, Timestamp};
use crate::replay_guard::ReplayGuard;
use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::Value;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Holds the shared secret and freshness windows.
///
/// A value of this type only exists once configuration succeeded, so every
/// operation can assume a usable key. It is `Send + Sync` and holds no
/// mutable state; share it through `Arc`.
///
/// ## Example
///
/// ```rust,ignore
/// let auth = MessageAuthenticator::new(config)?;
///
/// let wire = auth.wrap(payload)?;
/// match auth.unwrap(&wire) {
///     Ok(payload) => handle(payload),
///     Err(e) => reject(e),
/// }
/// ```
pub struct MessageAuthenticator<T: TimeSource = SystemTimeSource> {
    config: AuthenticatorConfig,
    /// HMAC state keyed once at construction; cloned per operation.
    keyed: HmacSha256,
    clock: T,
}

impl MessageAuthenticator<SystemTimeSource> {
    /// Build an authenticator on the system clock.
    pub fn new(config: AuthenticatorConfig) -> Result<Self, ConfigError> {
        Self::with_time_source(config, SystemTimeSource)
    }

    /// Build from `IPC_AUTH_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(AuthenticatorConfig::from_env()?)
    }
}

impl<T: TimeSource> MessageAuthenticator<T> {
    /// Build an authenticator reading time from `clock`.
    pub fn with_time_source(config: AuthenticatorConfig, clock: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let keyed = <HmacSha256 as Mac>::new_from_slice(config.secret.as_bytes())
            .map_err(|_| ConfigError::InvalidKey)?;
        Ok(Self {
            config,
            keyed,
            clock,
        })
    }

    pub fn replay_window_secs(&self) -> u64 {
        self.config.replay_window_secs
    }

    pub fn clock_skew_tolerance_secs(&self) -> u64 {
        self.config.clock_skew_tolerance_secs
    }

    /// Current time as seen by this authenticator.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // =========================================================================
    // SIGNING
    // =========================================================================

    /// Sign `payload`, stamping it with the current time.
    ///
    /// # Errors
    ///
    /// - `ReservedField` if the caller supplied `timestamp`
    pub fn sign(&self, payload: Payload) -> Result<Envelope, SignError> {
        if payload.contains_key(TIMESTAMP_FIELD) {
            return Err(SignError::ReservedField {
                field: TIMESTAMP_FIELD,
            });
        }

        let now = self.clock.now();
        let mut message = payload;
        message.insert(TIMESTAMP_FIELD.to_string(), Value::from(now));

        let signature = hex::encode(self.digest(&message)?);
        tracing::debug!(
            "[ipc-auth] Signed message with {} fields at {}",
            message.len(),
            now
        );

        Ok(Envelope { message, signature })
    }

    /// Sign any value that serializes to a JSON object.
    pub fn sign_value<S: Serialize + ?Sized>(&self, value: &S) -> Result<Envelope, SignError> {
        match serde_json::to_value(value)? {
            Value::Object(payload) => self.sign(payload),
            other => Err(SignError::InvalidPayload {
                found: json_type_name(&other),
            }),
        }
    }

    /// Sign `payload` and encode the envelope for a text transport.
    pub fn wrap(&self, payload: Payload) -> Result<String, SignError> {
        let envelope = self.sign(payload)?;
        Ok(envelope.to_wire()?)
    }

    // =========================================================================
    // VERIFICATION
    // =========================================================================

    /// Verify `envelope` and return its payload without the timestamp.
    pub fn verify(&self, envelope: &Envelope) -> Result<Payload, VerifyError> {
        match self.check(envelope) {
            Ok(()) => {
                let mut payload = envelope.message.clone();
                payload.remove(TIMESTAMP_FIELD);
                tracing::debug!("[ipc-auth] Envelope verified ({} fields)", payload.len());
                Ok(payload)
            }
            Err(e) => Err(rejected(e)),
        }
    }

    /// Verify an envelope given as untyped JSON.
    pub fn verify_value(&self, value: Value) -> Result<Payload, VerifyError> {
        let envelope = Envelope::from_value(value).map_err(rejected)?;
        self.verify(&envelope)
    }

    /// Verify, then reject the envelope if `guard` has already accepted it.
    ///
    /// The guard is only consulted after the signature checks out, so
    /// forged envelopes cannot fill it. A full guard refuses the envelope
    /// with `ReplayCacheFull`.
    pub fn verify_once(
        &self,
        envelope: &Envelope,
        guard: &ReplayGuard,
    ) -> Result<Payload, VerifyError> {
        let payload = self.verify(envelope)?;
        let digest = decode_signature(&envelope.signature).ok_or(VerifyError::InvalidSignature)?;
        guard
            .check_and_insert(digest, self.clock.now())
            .map_err(rejected)?;
        Ok(payload)
    }

    /// Decode a transport string and verify it.
    ///
    /// A string that is not JSON is an `UnwrapError::Decode`, distinct from
    /// every verification failure.
    pub fn unwrap(&self, wire: &str) -> Result<Payload, UnwrapError> {
        let value: Value = serde_json::from_str(wire).map_err(|e| {
            tracing::warn!("[ipc-auth] Envelope decode failed: {}", e);
            UnwrapError::Decode(e)
        })?;
        Ok(self.verify_value(value)?)
    }

    /// A `ReplayGuard` whose TTL covers this authenticator's freshness window.
    pub fn replay_guard(&self) -> ReplayGuard {
        ReplayGuard::new(
            self.config
                .replay_window_secs
                .saturating_add(self.config.clock_skew_tolerance_secs),
        )
    }

    fn check(&self, envelope: &Envelope) -> Result<(), VerifyError> {
        // 1. Shape
        let signature =
            decode_signature(&envelope.signature).ok_or(VerifyError::MalformedEnvelope {
                reason: "signature must be 64 lowercase hex characters",
            })?;

        // 2. Timestamp present
        let timestamp = envelope.timestamp().ok_or(VerifyError::MissingTimestamp)?;

        // 3. Freshness
        self.check_freshness(timestamp)?;

        // 4. Signature, constant-time over the fixed-length digest
        let mac = self
            .keyed_mac(&envelope.message)
            .map_err(|_| VerifyError::InvalidSignature)?;
        mac.verify_slice(&signature)
            .map_err(|_| VerifyError::InvalidSignature)
    }

    fn check_freshness(&self, timestamp: Timestamp) -> Result<(), VerifyError> {
        let now = self.clock.now();
        let delta = now.saturating_sub(timestamp);
        let window = i64::try_from(self.config.replay_window_secs).unwrap_or(i64::MAX);
        let tolerance = i64::try_from(self.config.clock_skew_tolerance_secs).unwrap_or(i64::MAX);

        if delta > window {
            return Err(VerifyError::MessageExpired {
                age_secs: delta,
                window_secs: self.config.replay_window_secs,
            });
        }
        if delta < -tolerance {
            return Err(VerifyError::TimestampInFuture {
                ahead_secs: delta.saturating_neg(),
                tolerance_secs: self.config.clock_skew_tolerance_secs,
            });
        }
        Ok(())
    }

    fn keyed_mac(&self, message: &Payload) -> Result<HmacSha256, serde_json::Error> {
        let bytes = canonical_json(message)?;
        let mut mac = self.keyed.clone();
        mac.update(&bytes);
        Ok(mac)
    }

    fn digest(&self, message: &Payload) -> Result<[u8; SIGNATURE_LEN], serde_json::Error> {
        let bytes = self.keyed_mac(message)?.finalize().into_bytes();
        let mut digest = [0u8; SIGNATURE_LEN];
        digest.copy_from_slice(&bytes);
        Ok(digest)
    }
}

impl<T: TimeSource> std::fmt::Debug for MessageAuthenticator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageAuthenticator")
            .field("secret", &self.config.secret)
            .field("replay_window_secs", &self.config.replay_window_secs)
            .field(
                "clock_skew_tolerance_secs",
                &self.config.clock_skew_tolerance_secs,
            )
            .finish_non_exhaustive()
    }
}

fn rejected(err: VerifyError) -> VerifyError {
    tracing::warn!(kind = err.kind(), "[ipc-auth] Envelope rejected: {}", err);
    err
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

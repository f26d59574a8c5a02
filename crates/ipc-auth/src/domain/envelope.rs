//! # Signed Envelope
//!
//! Wire shape shared by sender and receiver:
//!
//! ```text
//! {
//!   "message":   { <payload fields>, "timestamp": <integer, Unix seconds> },
//!   "signature": "<64 lowercase hex chars>"
//! }
//! ```
//!
//! The timestamp lives inside `message` so it is covered by the signature;
//! it cannot be swapped without invalidating the envelope.

use crate::error::VerifyError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-owned message fields.
pub type Payload = Map<String, Value>;

/// Field injected by `sign` and stripped by `verify`.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Hex length of an HMAC-SHA256 digest.
pub const SIGNATURE_HEX_LEN: usize = 64;

/// Digest length in bytes.
pub const SIGNATURE_LEN: usize = 32;

const MESSAGE_FIELD: &str = "message";
const SIGNATURE_FIELD: &str = "signature";

/// A signed message ready for transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Payload fields plus the injected `timestamp`.
    pub message: Payload,
    /// Lowercase hex HMAC-SHA256 over the canonical `message`.
    pub signature: String,
}

impl Envelope {
    /// Classify an untyped JSON value into an envelope.
    ///
    /// Shape problems map to `MalformedEnvelope`; nothing here panics.
    pub fn from_value(value: Value) -> Result<Self, VerifyError> {
        let mut outer = match value {
            Value::Object(map) => map,
            _ => {
                return Err(VerifyError::MalformedEnvelope {
                    reason: "envelope is not an object",
                })
            }
        };

        let message = match outer.remove(MESSAGE_FIELD) {
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(VerifyError::MalformedEnvelope {
                    reason: "message is not an object",
                })
            }
            None => {
                return Err(VerifyError::MalformedEnvelope {
                    reason: "message missing",
                })
            }
        };

        let signature = match outer.remove(SIGNATURE_FIELD) {
            Some(Value::String(s)) => s,
            Some(_) => {
                return Err(VerifyError::MalformedEnvelope {
                    reason: "signature is not a string",
                })
            }
            None => {
                return Err(VerifyError::MalformedEnvelope {
                    reason: "signature missing",
                })
            }
        };

        if !outer.is_empty() {
            return Err(VerifyError::MalformedEnvelope {
                reason: "unexpected top-level field",
            });
        }

        Ok(Self { message, signature })
    }

    /// The embedded timestamp, if present and integral.
    pub fn timestamp(&self) -> Option<i64> {
        self.message.get(TIMESTAMP_FIELD).and_then(Value::as_i64)
    }

    /// Serialize for a text transport.
    pub fn to_wire(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Consume the envelope, returning the message without its timestamp.
    pub fn into_payload(self) -> Payload {
        let mut payload = self.message;
        payload.remove(TIMESTAMP_FIELD);
        payload
    }
}

/// Decode a wire signature into digest bytes.
///
/// Only exactly 64 lowercase hex characters are accepted.
pub(crate) fn decode_signature(signature: &str) -> Option<[u8; SIGNATURE_LEN]> {
    if signature.len() != SIGNATURE_HEX_LEN {
        return None;
    }
    if !signature
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    {
        return None;
    }
    let mut out = [0u8; SIGNATURE_LEN];
    hex::decode_to_slice(signature, &mut out).ok()?;
    Some(out)
}

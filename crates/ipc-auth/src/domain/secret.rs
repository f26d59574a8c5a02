//! # Shared Secret
//!
//! Owned copy of the HMAC key. Zeroized on drop and never printed.

use crate::error::ConfigError;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The shared secret both processes sign with.
///
/// Any non-empty byte string is accepted; HMAC handles keys of arbitrary length.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    inner: Vec<u8>,
}

impl SecretKey {
    /// Create a secret from raw bytes, rejecting an empty key.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let inner = bytes.into();
        if inner.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(Self { inner })
    }

    /// Get the secret bytes.
    ///
    /// # Security
    ///
    /// Use immediately; do not keep copies around.
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Always false for a constructed key.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

//! # Outbound Ports
//!
//! - `TimeSource`: wall clock, swappable for a frozen clock in tests
//! - `SecretSource`: where the shared secret comes from

use crate::domain::SecretKey;
use crate::error::ConfigError;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

/// Unix time in whole seconds.
pub type Timestamp = i64;

/// Default environment variable holding the shared secret.
pub const DEFAULT_SECRET_ENV: &str = "IPC_AUTH_SECRET";

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current timestamp in seconds since epoch.
    fn now(&self) -> Timestamp;
}

/// Abstract interface for loading the shared secret.
///
/// Implementations might read an environment variable, a file, or a vault.
pub trait SecretSource: Send + Sync {
    /// Load the secret. Absence is a configuration error.
    fn load(&self) -> Result<SecretKey, ConfigError>;

    /// Human-readable name used in error messages and logs.
    fn describe(&self) -> String;
}

// =============================================================================
// ADAPTER IMPLEMENTATIONS
// =============================================================================

/// Default time source using system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as Timestamp)
            .unwrap_or(0)
    }
}

/// Frozen clock. Only moves when told to.
#[derive(Debug, Default)]
pub struct FixedTimeSource {
    now: AtomicI64,
}

impl FixedTimeSource {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Reads the secret from an environment variable, taking its bytes as-is.
#[derive(Debug, Clone)]
pub struct EnvSecretSource {
    var: String,
}

impl EnvSecretSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvSecretSource {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET_ENV)
    }
}

impl SecretSource for EnvSecretSource {
    fn load(&self) -> Result<SecretKey, ConfigError> {
        match std::env::var_os(&self.var) {
            Some(value) if !value.is_empty() => SecretKey::new(value.into_encoded_bytes()),
            Some(_) => Err(ConfigError::EmptySecret),
            None => Err(ConfigError::MissingSecret {
                source_name: self.describe(),
            }),
        }
    }

    fn describe(&self) -> String {
        format!("environment variable {}", self.var)
    }
}

/// In-memory secret source. The secret can be provided after construction,
/// which models a source that becomes available later.
#[derive(Debug, Default)]
pub struct StaticSecretSource {
    secret: RwLock<Option<Vec<u8>>>,
}

impl StaticSecretSource {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: RwLock::new(Some(secret.into())),
        }
    }

    /// A source with nothing in it yet.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Make a secret available.
    pub fn provide(&self, secret: impl Into<Vec<u8>>) {
        *self.secret.write() = Some(secret.into());
    }
}

impl SecretSource for StaticSecretSource {
    fn load(&self) -> Result<SecretKey, ConfigError> {
        match self.secret.read().as_ref() {
            Some(bytes) => SecretKey::new(bytes.clone()),
            None => Err(ConfigError::MissingSecret {
                source_name: self.describe(),
            }),
        }
    }

    fn describe(&self) -> String {
        "static secret".to_string()
    }
}

impl<S: SecretSource + ?Sized> SecretSource for std::sync::Arc<S> {
    fn load(&self) -> Result<SecretKey, ConfigError> {
        (**self).load()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

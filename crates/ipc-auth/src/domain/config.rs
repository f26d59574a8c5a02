//! # Authenticator Configuration
//!
//! Immutable once built. The secret comes from a [`SecretSource`]; the two
//! freshness windows have defaults with environment overrides.
//!
//! # Example
//!
//! ```ignore
//! use ipc_auth::domain::AuthenticatorConfigBuilder;
//!
//! let config = AuthenticatorConfigBuilder::new()
//!     .secret(b"s3cret".to_vec())
//!     .replay_window_secs(120)
//!     .build()?;
//! ```
//!
//! [`SecretSource`]: crate::ports::SecretSource

use super::secret::SecretKey;
use crate::error::ConfigError;
use crate::ports::{EnvSecretSource, SecretSource};

/// Default maximum message age in seconds.
pub const DEFAULT_REPLAY_WINDOW_SECS: u64 = 300;

/// Default tolerance for sender clocks running ahead, in seconds.
pub const DEFAULT_CLOCK_SKEW_TOLERANCE_SECS: u64 = 60;

/// Environment variable overriding the replay window.
pub const ENV_REPLAY_WINDOW_SECS: &str = "IPC_AUTH_REPLAY_WINDOW_SECS";

/// Environment variable overriding the clock skew tolerance.
pub const ENV_CLOCK_SKEW_SECS: &str = "IPC_AUTH_CLOCK_SKEW_SECS";

/// Complete authenticator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatorConfig {
    /// Shared HMAC key.
    pub secret: SecretKey,
    /// Maximum accepted message age.
    pub replay_window_secs: u64,
    /// Maximum accepted distance into the future.
    pub clock_skew_tolerance_secs: u64,
}

impl AuthenticatorConfig {
    /// Configuration with default windows.
    pub fn new(secret: SecretKey) -> Self {
        Self {
            secret,
            replay_window_secs: DEFAULT_REPLAY_WINDOW_SECS,
            clock_skew_tolerance_secs: DEFAULT_CLOCK_SKEW_TOLERANCE_SECS,
        }
    }

    /// Load from the process environment.
    ///
    /// Reads the secret from `IPC_AUTH_SECRET` and the optional window
    /// overrides. A missing secret is fatal; a malformed override is too.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&EnvSecretSource::default(), |key| std::env::var(key).ok())
    }

    /// Load the secret from `source` and window overrides through `lookup`.
    pub fn from_source<S, F>(source: &S, lookup: F) -> Result<Self, ConfigError>
    where
        S: SecretSource + ?Sized,
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(source.load()?);

        if let Some(value) = lookup(ENV_REPLAY_WINDOW_SECS) {
            config.replay_window_secs = parse_secs(ENV_REPLAY_WINDOW_SECS, &value)?;
        }
        if let Some(value) = lookup(ENV_CLOCK_SKEW_SECS) {
            config.clock_skew_tolerance_secs = parse_secs(ENV_CLOCK_SKEW_SECS, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the secret is empty
    /// - the replay window is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.replay_window_secs == 0 {
            return Err(ConfigError::ZeroReplayWindow);
        }
        Ok(())
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
        })
}

/// Fluent builder for [`AuthenticatorConfig`].
#[derive(Debug, Default)]
pub struct AuthenticatorConfigBuilder {
    secret: Option<Vec<u8>>,
    replay_window_secs: Option<u64>,
    clock_skew_tolerance_secs: Option<u64>,
}

impl AuthenticatorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn replay_window_secs(mut self, secs: u64) -> Self {
        self.replay_window_secs = Some(secs);
        self
    }

    pub fn clock_skew_tolerance_secs(mut self, secs: u64) -> Self {
        self.clock_skew_tolerance_secs = Some(secs);
        self
    }

    pub fn build(self) -> Result<AuthenticatorConfig, ConfigError> {
        let secret = self.secret.ok_or_else(|| ConfigError::MissingSecret {
            source_name: "builder secret".to_string(),
        })?;
        let mut config = AuthenticatorConfig::new(SecretKey::new(secret)?);
        if let Some(secs) = self.replay_window_secs {
            config.replay_window_secs = secs;
        }
        if let Some(secs) = self.clock_skew_tolerance_secs {
            config.clock_skew_tolerance_secs = secs;
        }
        config.validate()?;
        Ok(config)
    }
}

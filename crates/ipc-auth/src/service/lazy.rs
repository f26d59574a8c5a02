//! # Lazily Initialized Authenticator
//!
//! For hosts that cannot resolve the secret before first use.
//!
//! ## States
//!
//! - `Uninitialized`: every call tries to load the secret again; while that
//!   fails, the call fails with the `ConfigError`
//! - `Ready`: the inner [`MessageAuthenticator`] is published and never changes
//!
//! The transition happens exactly once. Initialization is serialized by a
//! mutex so concurrent first callers load the secret a single time; once
//! ready, reads go through `OnceLock::get` and take no lock.

use super::authenticator::MessageAuthenticator;
use crate::domain::{AuthenticatorConfig, Envelope, Payload};
use crate::error::{AuthError, ConfigError};
use crate::ports::{EnvSecretSource, SecretSource, SystemTimeSource, TimeSource};
use crate::replay_guard::ReplayGuard;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::OnceLock;

type SettingLookup = fn(&str) -> Option<String>;

fn no_overrides(_: &str) -> Option<String> {
    None
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Authenticator that resolves its secret on first use.
pub struct LazyAuthenticator<S: SecretSource, T: TimeSource + Clone = SystemTimeSource> {
    source: S,
    clock: T,
    lookup: SettingLookup,
    ready: OnceLock<MessageAuthenticator<T>>,
    init_lock: Mutex<()>,
}

impl LazyAuthenticator<EnvSecretSource> {
    /// Secret and window overrides from the `IPC_AUTH_*` environment.
    pub fn from_env() -> Self {
        let mut lazy = Self::new(EnvSecretSource::default());
        lazy.lookup = env_lookup;
        lazy
    }
}

impl<S: SecretSource> LazyAuthenticator<S> {
    /// Default windows, system clock.
    pub fn new(source: S) -> Self {
        Self::with_time_source(source, SystemTimeSource)
    }
}

impl<S: SecretSource, T: TimeSource + Clone> LazyAuthenticator<S, T> {
    pub fn with_time_source(source: S, clock: T) -> Self {
        Self {
            source,
            clock,
            lookup: no_overrides,
            ready: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    /// Whether the secret has been loaded.
    pub fn is_ready(&self) -> bool {
        self.ready.get().is_some()
    }

    /// The configured authenticator, initializing it if needed.
    pub fn get(&self) -> Result<&MessageAuthenticator<T>, ConfigError> {
        if let Some(auth) = self.ready.get() {
            return Ok(auth);
        }

        let _guard = self.init_lock.lock();
        if let Some(auth) = self.ready.get() {
            return Ok(auth);
        }

        let auth = AuthenticatorConfig::from_source(&self.source, self.lookup)
            .and_then(|config| MessageAuthenticator::with_time_source(config, self.clock.clone()))
            .map_err(|e| {
                tracing::warn!(
                    "[ipc-auth] Authenticator not ready ({}): {}",
                    self.source.describe(),
                    e
                );
                e
            })?;

        tracing::info!(
            "[ipc-auth] Authenticator ready (secret from {})",
            self.source.describe()
        );
        Ok(self.ready.get_or_init(|| auth))
    }

    pub fn sign(&self, payload: Payload) -> Result<Envelope, AuthError> {
        Ok(self.get()?.sign(payload)?)
    }

    pub fn verify(&self, envelope: &Envelope) -> Result<Payload, AuthError> {
        Ok(self.get()?.verify(envelope)?)
    }

    pub fn verify_value(&self, value: Value) -> Result<Payload, AuthError> {
        Ok(self.get()?.verify_value(value)?)
    }

    pub fn verify_once(
        &self,
        envelope: &Envelope,
        guard: &ReplayGuard,
    ) -> Result<Payload, AuthError> {
        Ok(self.get()?.verify_once(envelope, guard)?)
    }

    pub fn wrap(&self, payload: Payload) -> Result<String, AuthError> {
        Ok(self.get()?.wrap(payload)?)
    }

    pub fn unwrap(&self, wire: &str) -> Result<Payload, AuthError> {
        Ok(self.get()?.unwrap(wire)?)
    }
}

//! # Replay Guard
//!
//! Optional second line of replay defence on top of the timestamp window.
//!
//! The timestamp check bounds how long a captured envelope stays usable; the
//! guard closes that window entirely for receivers that keep state, by
//! remembering every signature accepted while it could still pass the
//! freshness check.
//!
//! ## Design
//!
//! - `HashMap<[u8; 32], Timestamp>` from signature digest to expiry
//! - Expired entries are evicted when the cache reaches capacity
//! - Live entries are never evicted: when the cache is still full after
//!   purging, new envelopes are refused with `ReplayCacheFull` until older
//!   entries expire

use crate::error::VerifyError;
use crate::ports::Timestamp;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Maximum cache size before forced cleanup.
pub const MAX_REPLAY_CACHE_SIZE: usize = 100_000;

/// Digest-keyed cache of accepted envelopes.
///
/// ```rust,ignore
/// let guard = ReplayGuard::new(360);
///
/// assert!(guard.check_and_insert(digest, now).is_ok()); // first delivery
/// assert_eq!(guard.check_and_insert(digest, now), Err(VerifyError::Replayed));
/// ```
#[derive(Debug)]
pub struct ReplayGuard {
    seen: RwLock<HashMap<[u8; 32], Timestamp>>,
    ttl_secs: i64,
    max_entries: usize,
}

impl ReplayGuard {
    /// Guard that remembers signatures for `ttl_secs`.
    ///
    /// Use at least `replay_window_secs + clock_skew_tolerance_secs` so an
    /// entry outlives every instant at which its envelope is still fresh.
    pub fn new(ttl_secs: u64) -> Self {
        Self::with_capacity(ttl_secs, MAX_REPLAY_CACHE_SIZE)
    }

    pub fn with_capacity(ttl_secs: u64, max_entries: usize) -> Self {
        Self {
            seen: RwLock::new(HashMap::new()),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
            max_entries: max_entries.max(1),
        }
    }

    /// Record `digest` as seen at `now`.
    ///
    /// # Errors
    ///
    /// - `VerifyError::Replayed` if the digest is still remembered
    /// - `VerifyError::ReplayCacheFull` if every slot holds a live entry
    pub fn check_and_insert(&self, digest: [u8; 32], now: Timestamp) -> Result<(), VerifyError> {
        let mut seen = self.seen.write();

        if let Some(&expiry) = seen.get(&digest) {
            if expiry > now {
                return Err(VerifyError::Replayed);
            }
        }

        if seen.len() >= self.max_entries {
            seen.retain(|_, expiry| *expiry > now);
            if seen.len() >= self.max_entries {
                return Err(VerifyError::ReplayCacheFull {
                    capacity: self.max_entries,
                });
            }
        }

        seen.insert(digest, now.saturating_add(self.ttl_secs));
        Ok(())
    }

    /// Drop every entry that has expired by `now`.
    pub fn purge_expired(&self, now: Timestamp) {
        self.seen.write().retain(|_, expiry| *expiry > now);
    }

    pub fn clear(&self) {
        self.seen.write().clear();
    }

    pub fn len(&self) -> usize {
        self.seen.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

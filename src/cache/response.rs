use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};
use super::error::{CacheError, CacheResult};
use crate::hashing::Fingerprint;

/// A cached payload and its bookkeeping timestamps.
#[derive(Debug, Clone)]
pub struct CacheEntry<P> {
    pub fingerprint: Fingerprint,
    pub payload: Arc<P>,
    pub created_at: DateTime<Utc>,
    pub last_access_at: DateTime<Utc>,
}

/// Point-in-time view of the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub ttl_secs: u64,
    /// Minimum `last_access_at` across entries.
    pub oldest_access: Option<DateTime<Utc>>,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct CacheState<P> {
    entries: HashMap<Fingerprint, CacheEntry<P>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<P> Default for CacheState<P> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }
}

/// Bounded, time-expiring memo of pipeline responses.
///
/// Entries expire `ttl` after creation (checked lazily on `get`). At capacity, inserting
/// a new key evicts exactly one entry: the least recently accessed, ties broken by the
/// smallest fingerprint. All check-then-act sequences run under one mutex that is never
/// held across an `.await`.
pub struct ResponseCache<P> {
    state: Mutex<CacheState<P>>,
    max_size: usize,
    ttl: Duration,
    ttl_delta: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl<P: Send + Sync> ResponseCache<P> {
    /// Creates a cache reading time from the wall clock.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self::with_clock(max_size, ttl, Arc::new(SystemClock))
    }

    /// Creates a cache reading time from `clock`.
    pub fn with_clock(max_size: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            max_size,
            ttl,
            ttl_delta: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the payload for `fingerprint` unless absent or expired.
    ///
    /// An expired entry is removed during the check. A hit refreshes `last_access_at`.
    pub fn get(&self, fingerprint: &Fingerprint) -> CacheResult<Option<Arc<P>>> {
        let now = self.clock.now();
        let mut state = self.lock()?;

        let Some(created_at) = state.entries.get(fingerprint).map(|e| e.created_at) else {
            state.misses += 1;
            return Ok(None);
        };

        if now - created_at > self.ttl_delta {
            state.entries.remove(fingerprint);
            state.misses += 1;
            debug!(fingerprint = %fingerprint, "Cache entry expired");
            return Ok(None);
        }

        state.hits += 1;
        Ok(state.entries.get_mut(fingerprint).map(|entry| {
            entry.last_access_at = now;
            Arc::clone(&entry.payload)
        }))
    }

    /// Stores `payload` under `fingerprint`, evicting one entry if a new key would
    /// exceed capacity.
    pub fn set(&self, fingerprint: Fingerprint, payload: impl Into<Arc<P>>) -> CacheResult<()> {
        if self.max_size == 0 {
            return Ok(());
        }

        let now = self.clock.now();
        let mut state = self.lock()?;

        if !state.entries.contains_key(&fingerprint) && state.entries.len() >= self.max_size {
            let victim = state
                .entries
                .values()
                .min_by(|a, b| {
                    a.last_access_at
                        .cmp(&b.last_access_at)
                        .then_with(|| a.fingerprint.cmp(&b.fingerprint))
                })
                .map(|entry| entry.fingerprint.clone());

            if let Some(victim) = victim {
                state.entries.remove(&victim);
                state.evictions += 1;
                debug!(evicted = %victim, "Cache at capacity, evicted least recently used");
            }
        }

        state.entries.insert(
            fingerprint.clone(),
            CacheEntry {
                fingerprint,
                payload: payload.into(),
                created_at: now,
                last_access_at: now,
            },
        );
        Ok(())
    }

    /// Removes every entry and resets counters.
    pub fn clear(&self) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *state = CacheState::default();
        drop(state);
        self.state.clear_poison();
    }

    pub fn stats(&self) -> CacheResult<CacheStats> {
        let state = self.lock()?;
        Ok(CacheStats {
            size: state.entries.len(),
            max_size: self.max_size,
            ttl_secs: self.ttl.as_secs(),
            oldest_access: state.entries.values().map(|e| e.last_access_at).min(),
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
        })
    }

    pub fn len(&self) -> CacheResult<usize> {
        Ok(self.lock()?.entries.len())
    }

    pub fn is_empty(&self) -> CacheResult<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> CacheResult<MutexGuard<'_, CacheState<P>>> {
        match self.state.lock() {
            Ok(guard) => Ok(guard),
            Err(poisoned) => {
                let mut guard = poisoned.into_inner();
                *guard = CacheState::default();
                drop(guard);
                self.state.clear_poison();
                warn!("Response cache lock poisoned, cache reset");
                Err(CacheError::Poisoned)
            }
        }
    }

    /// Poisons the internal mutex by panicking while holding it.
    #[cfg(test)]
    pub(crate) fn poison_for_test(&self) {
        std::thread::scope(|scope| {
            let _ = scope
                .spawn(|| {
                    let _guard = self.state.lock();
                    panic!("Intentional panic to poison lock for testing");
                })
                .join();
        });
    }
}

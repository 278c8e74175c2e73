//! Memoization of analytics results.
//!
//! Entries are keyed by operation name and an input fingerprint. An entry
//! older than the TTL counts as a miss and is dropped on the next lookup or
//! purge.

use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;

use crate::error::EngineResult;

/// Hash of an operation's serialized inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Fingerprints any serializable value through its JSON form.
    pub fn of<T: Serialize + ?Sized>(value: &T) -> EngineResult<Self> {
        let bytes = serde_json::to_vec(value)?;
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        Ok(Self(hasher.finish()))
    }

    /// Combines two fingerprints, order-sensitive.
    #[must_use]
    pub fn combine(self, other: Fingerprint) -> Self {
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        other.0.hash(&mut hasher);
        Self(hasher.finish())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    operation: &'static str,
    fingerprint: Fingerprint,
}

struct CachedEntry {
    value: Arc<dyn Any + Send + Sync>,
    inserted_at: Instant,
}

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to compute.
    pub misses: u64,
    /// Live entries, expired ones included until purged.
    pub entries: usize,
}

/// Thread-safe TTL cache of analytics results.
pub struct AnalyticsCache {
    entries: DashMap<CacheKey, CachedEntry>,
    ttl: Duration,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl AnalyticsCache {
    /// Creates an enabled cache.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            enabled: true,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// A cache that always computes.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(Duration::ZERO)
        }
    }

    /// Entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached result of `operation` for `fingerprint`, or runs
    /// `compute` and stores its result. Errors are not cached.
    pub fn get_or_compute<T, F>(
        &self,
        operation: &'static str,
        fingerprint: Fingerprint,
        compute: F,
    ) -> EngineResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> EngineResult<T>,
    {
        if !self.enabled {
            return compute();
        }

        let key = CacheKey {
            operation,
            fingerprint,
        };
        if let Some(value) = self.lookup::<T>(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(operation, %fingerprint, "cache hit");
            return Ok(value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(operation, %fingerprint, "cache miss");
        let value = compute()?;
        self.entries.insert(
            key,
            CachedEntry {
                value: Arc::new(value.clone()),
                inserted_at: Instant::now(),
            },
        );
        Ok(value)
    }

    fn lookup<T: Clone + 'static>(&self, key: &CacheKey) -> Option<T> {
        {
            let entry = self.entries.get(key)?;
            if entry.inserted_at.elapsed() <= self.ttl {
                return entry.value.downcast_ref::<T>().cloned();
            }
        }
        // The read guard must be released before removing.
        self.entries.remove(key);
        tracing::debug!(operation = key.operation, "cache entry expired");
        None
    }

    /// Drops every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.inserted_at.elapsed() <= self.ttl);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::info!(removed, "evicted expired analytics results");
        }
        removed
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}

impl Default for AnalyticsCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(4 * 60 * 60))
    }
}

impl fmt::Debug for AnalyticsCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyticsCache")
            .field("ttl", &self.ttl)
            .field("enabled", &self.enabled)
            .field("stats", &self.stats())
            .finish()
    }
}

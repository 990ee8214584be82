//! Tier-1 in-process cache.
//!
//! [`MemoryCache`] is a bounded, TTL-based cache keyed by signature hash.
//! It never blocks on I/O, so the durable tier is only consulted after a
//! miss here.
//!
//! # Eviction
//!
//! Backed by moka with an LRU eviction policy: when full, the least
//! recently used entry goes. This replaces the simpler "evict whichever
//! entry iteration yields first" policy and changes which entries survive
//! under pressure; it never changes the capacity bound.

use std::hash::Hash;
use std::time::Duration;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;

/// Configuration for the in-process tier.
///
/// ```rust
/// # use larder::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(5_000)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 1,000.
    pub max_entries: u64,
    /// Time-to-live for cached entries. Default: 1 hour.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Bounded TTL cache, generic over the stored value.
///
/// Thread-safe (moka handles concurrent access internally); share it by
/// reference or behind an `Arc`.
pub struct MemoryCache<V, K = String>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    entries: Cache<K, V>,
    max_entries: u64,
}

impl<V, K> MemoryCache<V, K>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty cache from the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self {
            entries,
            max_entries: config.max_entries,
        }
    }

    /// Look up a live entry. Expired entries read as a miss and are
    /// dropped by the cache.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key)
    }

    /// Insert (or overwrite) an entry, expiring `ttl` from now.
    pub fn set(&self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    /// Drop a single entry.
    pub fn remove(&self, key: &K) {
        self.entries.invalidate(key);
    }

    /// Evict all entries.
    pub fn clear(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks();
    }

    /// Number of live entries.
    ///
    /// Flushes pending evictions first so the count never exceeds the
    /// configured maximum.
    pub fn size(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Configured capacity.
    pub fn max_entries(&self) -> u64 {
        self.max_entries
    }
}

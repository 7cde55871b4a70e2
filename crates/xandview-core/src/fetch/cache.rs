// ── Endpoint cache ──
//
// TTL cache keyed by endpoint name. Entries expire `ttl` after insertion
// and are dropped lazily on read, or eagerly via `evict_expired`. Time is
// read from `tokio::time::Instant` so paused-clock tests can advance it.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

/// Upper bound on live entries before the oldest is evicted.
pub const DEFAULT_MAX_ENTRIES: usize = 64;

struct CacheEntry<V> {
    value: Arc<V>,
    inserted_at: Instant,
}

/// In-memory TTL cache. Values are handed out as cheap `Arc` clones.
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    max_entries: usize,
}

impl<V> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    fn is_fresh(&self, entry: &CacheEntry<V>) -> bool {
        entry.inserted_at.elapsed() < self.ttl
    }

    /// Fresh value for `key`. An expired entry counts as a miss and is removed.
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        let (value, fresh) = {
            let entry = self.entries.get(key)?;
            (Arc::clone(&entry.value), self.is_fresh(&entry))
        };
        if fresh {
            debug!(key, "cache hit");
            return Some(value);
        }
        self.entries.remove_if(key, |_, entry| !self.is_fresh(entry));
        debug!(key, "cache entry expired");
        None
    }

    pub fn insert(&self, key: impl Into<String>, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.insert_arc(key.into(), Arc::clone(&value));
        value
    }

    pub fn insert_arc(&self, key: String, value: Arc<V>) {
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.evict_expired();
            if self.entries.len() >= self.max_entries {
                self.evict_oldest();
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn evict_expired(&self) {
        self.entries.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().inserted_at)
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }

    /// Number of stored entries, expired ones included until evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

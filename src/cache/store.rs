//! Cache Store Module
//!
//! Bounded key-value store combining HashMap storage with LRU tracking and lazy TTL expiration.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use crate::cache::{CacheEntry, LruTracker};
use crate::error::{CacheError, Result};

// == LRU TTL Cache ==
/// Fixed-capacity store with recency-ordered eviction and uniform optional TTL.
///
/// Expired entries are dropped lazily: they keep their slot until a probe
/// or an eviction reaches them.
#[derive(Debug)]
pub struct LruTtlCache<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL applied to every insert
    ttl: Option<Duration>,
}

impl<K: Hash + Eq + Clone, V> LruTtlCache<K, V> {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, must be greater than zero
    /// * `ttl` - Lifetime of each entry from its insertion, None = never expires
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        Ok(Self {
            entries: HashMap::with_capacity(capacity),
            lru: LruTracker::new(),
            capacity,
            ttl,
        })
    }

    // == Probe ==
    /// Returns whether `key` maps to a live entry.
    ///
    /// An expired entry is removed as a side effect. Recency order is untouched.
    pub fn probe(&mut self, key: &K) -> bool {
        let now = Instant::now();

        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired_at(now),
            None => return false,
        };

        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            return false;
        }

        true
    }

    // == Get ==
    /// Returns the live value for `key` and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if !self.probe(key) {
            return None;
        }

        self.lru.touch(key);
        self.entries.get(key).map(|entry| &entry.value)
    }

    // == Insert ==
    /// Stores `value` under `key` as the most recently used entry.
    ///
    /// When the store is full the least recently used entry is evicted first,
    /// even if `key` is already present; the evicted key is returned. Callers
    /// overwriting existing keys at full capacity can therefore lose an
    /// unrelated entry.
    pub fn insert(&mut self, key: K, value: V) -> Option<K> {
        let mut evicted = None;
        if self.entries.len() == self.capacity {
            if let Some(oldest) = self.lru.evict_oldest() {
                self.entries.remove(&oldest);
                evicted = Some(oldest);
            }
        }

        let entry = CacheEntry::new(value, self.ttl, Instant::now());
        self.lru.touch(&key);
        self.entries.insert(key, entry);

        evicted
    }

    /// Removes every entry; capacity and TTL are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Length ==
    /// Returns the number of occupied slots, counting expired entries not yet probed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }
}

//! Shared memoizer state: one bounded store plus hit/miss counters behind one lock.

use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::{CacheInfo, LruTtlCache};
use crate::error::Result;

// == Cache Control ==
/// Management surface shared by every memoized function, sync or async.
///
/// This is what the registry holds, so it carries no knowledge of argument
/// or value types.
pub trait CacheControl: Send + Sync {
    /// Registry identifier
    fn name(&self) -> &str;

    /// Snapshot of hits, misses, capacity and occupancy.
    fn cache_info(&self) -> CacheInfo;

    /// Drops every entry and resets hits and misses to zero.
    fn cache_clear(&self);
}

#[derive(Debug)]
struct Counters<K, V> {
    store: LruTtlCache<K, V>,
    hits: u64,
    misses: u64,
}

/// Store and statistics of one memoized function.
#[derive(Debug)]
pub struct MemoState<K, V> {
    name: String,
    inner: Mutex<Counters<K, V>>,
}

impl<K: Hash + Eq + Clone, V: Clone> MemoState<K, V> {
    pub fn new(name: impl Into<String>, capacity: usize, ttl: Option<Duration>) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            inner: Mutex::new(Counters {
                store: LruTtlCache::new(capacity, ttl)?,
                hits: 0,
                misses: 0,
            }),
        })
    }

    // == Lookup ==
    /// Returns the cached value and counts a hit, or counts a miss.
    ///
    /// The miss is recorded before the caller computes anything, so a failed
    /// or abandoned computation still shows up in the statistics.
    pub fn lookup(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        let cached = inner.store.get(key).cloned();

        match cached {
            Some(value) => {
                inner.hits += 1;
                trace!(cache = %self.name, "cache hit");
                Some(value)
            }
            None => {
                inner.misses += 1;
                trace!(cache = %self.name, "cache miss");
                None
            }
        }
    }

    /// Stores a freshly computed value.
    pub fn store(&self, key: K, value: V) {
        let mut inner = self.inner.lock();

        if inner.store.insert(key, value).is_some() {
            debug!(cache = %self.name, "evicted least recently used entry");
        }
    }
}

impl<K, V> CacheControl for MemoState<K, V>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn cache_info(&self) -> CacheInfo {
        let inner = self.inner.lock();

        CacheInfo {
            hits: inner.hits,
            misses: inner.misses,
            maxsize: inner.store.capacity(),
            currsize: inner.store.len(),
        }
    }

    fn cache_clear(&self) {
        let mut inner = self.inner.lock();

        inner.store.clear();
        inner.hits = 0;
        inner.misses = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_counts_hits_and_misses() {
        let state = MemoState::new("lookup", 4, None).unwrap();

        assert_eq!(state.lookup(&1), None);
        state.store(1, "one");
        assert_eq!(state.lookup(&1), Some("one"));
        assert_eq!(state.lookup(&1), Some("one"));

        let info = state.cache_info();
        assert_eq!(info.hits, 2);
        assert_eq!(info.misses, 1);
        assert_eq!(info.maxsize, 4);
        assert_eq!(info.currsize, 1);
    }

    #[test]
    fn test_clear_resets_counters() {
        let state = MemoState::new("clear", 2, None).unwrap();
        state.store(1, 1);
        let _ = state.lookup(&1);
        let _ = state.lookup(&2);

        state.cache_clear();

        assert_eq!(
            state.cache_info(),
            CacheInfo {
                hits: 0,
                misses: 0,
                maxsize: 2,
                currsize: 0,
            }
        );
        assert_eq!(state.name(), "clear");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(MemoState::<u8, u8>::new("zero", 0, None).is_err());
    }
}

//! Cache Statistics Module
//!
//! Snapshot of a memoized cache's hit/miss counters and occupancy.

use serde::{Deserialize, Serialize};

// == Cache Info ==
/// Point-in-time statistics of one memoized cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheInfo {
    /// Calls answered from the cache
    pub hits: u64,
    /// Calls that ran the wrapped function
    pub misses: u64,
    /// Configured capacity
    pub maxsize: usize,
    /// Entries currently held, including expired ones not yet probed
    pub currsize: usize,
}

impl CacheInfo {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no calls have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

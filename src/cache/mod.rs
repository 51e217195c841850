//! Cache Module
//!
//! Bounded in-memory storage with lazy TTL expiration and LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheInfo;
pub use store::LruTtlCache;

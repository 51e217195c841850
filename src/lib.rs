//! Memo Cache - Bounded TTL memoization for Rust functions
//!
//! Wraps sync and async functions with LRU caches that honour an optional
//! time-to-live, and keeps a process-wide registry so every cache can be
//! inspected or cleared by name.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod memo;
pub mod models;
pub mod registry;

pub use api::AppState;
pub use cache::{CacheInfo, LruTtlCache};
pub use config::Config;
pub use error::CacheError;
pub use memo::{
    memoize, memoize_async, memoize_async_named, memoize_named, AsyncMemoized, CacheControl,
    CacheKey, CallArgs, Invoke, Memoized,
};
pub use registry::{all_cache_info, clear_all_caches, CacheRegistry};

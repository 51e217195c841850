//! Memoization Module
//!
//! Wraps functions with bounded TTL caches and registers them for management.
//!
//! # Variants
//! - [`Memoized`]: functions returning `Result<V, E>` directly
//! - [`AsyncMemoized`]: functions returning a future of `Result<V, E>`
//!
//! Both keep hit/miss statistics, cache only `Ok` values, and expose
//! [`CacheControl`] for the registry.

mod future;
mod key;
mod state;
mod sync;

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::{CacheError, Result};
use crate::registry;

pub use future::AsyncMemoized;
pub use key::{ArgValue, CacheKey, CallArgs, CallKey, KeyAtom};
pub use state::{CacheControl, MemoState};
pub use sync::Memoized;

// == Invoke ==
/// Calling convention shared by both memoizer variants.
///
/// `Output` is the result itself for [`Memoized`] and a boxed future for
/// [`AsyncMemoized`].
pub trait Invoke<A> {
    type Output;

    fn invoke(&self, args: A) -> Self::Output;
}

// == Memoize ==
/// Wraps `func` with a cache of `capacity` entries and registers it globally
/// under the function's Rust path.
///
/// The path is `std::any::type_name::<F>()`, which is unique only for fn
/// items. A fn pointer (`f as fn(u8) -> ...`) is named by its signature and a
/// closure by its enclosing function, so two such caches can share a name and
/// the later one replaces the earlier in the registry. Use [`memoize_named`]
/// for those.
///
/// ```ignore
/// fn fib(n: u64) -> Result<u64, CacheError> { ... }
///
/// let fib = memoize(128, None, fib)?;
/// let value = fib.call(40)?;
/// ```
pub fn memoize<A, V, E, F>(
    capacity: usize,
    ttl: Option<Duration>,
    func: F,
) -> Result<Memoized<A, V, E, F>>
where
    A: CacheKey,
    V: Clone + Send + 'static,
    E: From<CacheError>,
    F: Fn(A) -> std::result::Result<V, E>,
{
    let memoized = Memoized::new(capacity, ttl, func)?;
    register(memoized.control());
    Ok(memoized)
}

/// Like [`memoize`], with an explicit registry name.
pub fn memoize_named<A, V, E, F>(
    name: impl Into<String>,
    capacity: usize,
    ttl: Option<Duration>,
    func: F,
) -> Result<Memoized<A, V, E, F>>
where
    A: CacheKey,
    V: Clone + Send + 'static,
    E: From<CacheError>,
    F: Fn(A) -> std::result::Result<V, E>,
{
    let memoized = Memoized::named(name, capacity, ttl, func)?;
    register(memoized.control());
    Ok(memoized)
}

/// Async counterpart of [`memoize`].
pub fn memoize_async<A, V, E, F, Fut>(
    capacity: usize,
    ttl: Option<Duration>,
    func: F,
) -> Result<AsyncMemoized<A, V, E, F>>
where
    A: CacheKey + Send + 'static,
    V: Clone + Send + 'static,
    E: From<CacheError> + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
{
    let memoized = AsyncMemoized::new(capacity, ttl, func)?;
    register(memoized.control());
    Ok(memoized)
}

/// Async counterpart of [`memoize_named`].
pub fn memoize_async_named<A, V, E, F, Fut>(
    name: impl Into<String>,
    capacity: usize,
    ttl: Option<Duration>,
    func: F,
) -> Result<AsyncMemoized<A, V, E, F>>
where
    A: CacheKey + Send + 'static,
    V: Clone + Send + 'static,
    E: From<CacheError> + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
{
    let memoized = AsyncMemoized::named(name, capacity, ttl, func)?;
    register(memoized.control());
    Ok(memoized)
}

fn register(cache: std::sync::Arc<dyn CacheControl>) {
    debug!(cache = %cache.name(), "registering memoized function");
    registry::global().register(cache.name().to_string(), cache);
}

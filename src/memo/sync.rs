//! Memoizer for functions that return their result directly.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::CacheInfo;
use crate::error::{CacheError, Result};
use crate::memo::key::CacheKey;
use crate::memo::state::{CacheControl, MemoState};
use crate::memo::Invoke;

// == Memoized ==
/// A function wrapped with a bounded TTL cache.
///
/// Only `Ok` results are cached. The wrapped function runs without the cache
/// lock held, so concurrent misses on one key may each run it.
///
/// Cloning is cheap and every clone shares the same cache.
pub struct Memoized<A: CacheKey, V, E, F> {
    state: Arc<MemoState<A::Key, V>>,
    func: Arc<F>,
    _call: PhantomData<fn(A) -> std::result::Result<V, E>>,
}

impl<A, V, E, F> Memoized<A, V, E, F>
where
    A: CacheKey,
    V: Clone + Send + 'static,
    E: From<CacheError>,
    F: Fn(A) -> std::result::Result<V, E>,
{
    /// Wraps `func`, naming the cache after its Rust path.
    ///
    /// Fails with [`CacheError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize, ttl: Option<Duration>, func: F) -> Result<Self> {
        Self::named(type_name::<F>(), capacity, ttl, func)
    }

    /// Wraps `func` under an explicit cache name.
    pub fn named(
        name: impl Into<String>,
        capacity: usize,
        ttl: Option<Duration>,
        func: F,
    ) -> Result<Self> {
        Ok(Self {
            state: Arc::new(MemoState::new(name, capacity, ttl)?),
            func: Arc::new(func),
            _call: PhantomData,
        })
    }

    // == Call ==
    /// Returns the cached result for `args`, computing and storing it on a miss.
    ///
    /// A key derivation failure is returned before anything is counted or
    /// called. Errors from the wrapped function are returned unchanged and
    /// leave the cache as it was, apart from the recorded miss.
    pub fn call(&self, args: A) -> std::result::Result<V, E> {
        let key = args.cache_key()?;

        if let Some(value) = self.state.lookup(&key) {
            return Ok(value);
        }

        let value = (self.func)(args)?;
        self.state.store(key, value.clone());
        Ok(value)
    }

    pub fn name(&self) -> &str {
        self.state.name()
    }

    pub fn cache_info(&self) -> CacheInfo {
        self.state.cache_info()
    }

    pub fn cache_clear(&self) {
        self.state.cache_clear()
    }

    /// Type-erased handle used for registration.
    pub fn control(&self) -> Arc<dyn CacheControl> {
        self.state.clone()
    }
}

impl<A, V, E, F> Invoke<A> for Memoized<A, V, E, F>
where
    A: CacheKey,
    V: Clone + Send + 'static,
    E: From<CacheError>,
    F: Fn(A) -> std::result::Result<V, E>,
{
    type Output = std::result::Result<V, E>;

    fn invoke(&self, args: A) -> Self::Output {
        self.call(args)
    }
}

impl<A: CacheKey, V, E, F> Clone for Memoized<A, V, E, F> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            func: Arc::clone(&self.func),
            _call: PhantomData,
        }
    }
}

impl<A: CacheKey, V, E, F> fmt::Debug for Memoized<A, V, E, F>
where
    V: Send,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("name", &self.state.name())
            .field("info", &self.state.cache_info())
            .finish()
    }
}

//! Memoizer for functions that resolve through a future.

use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{self, BoxFuture, FutureExt};

use crate::cache::CacheInfo;
use crate::error::{CacheError, Result};
use crate::memo::key::CacheKey;
use crate::memo::state::{CacheControl, MemoState};
use crate::memo::Invoke;

// == Async Memoized ==
/// An async function wrapped with a bounded TTL cache.
///
/// Key derivation and the hit/miss decision happen when [`call`](Self::call)
/// is invoked, before the returned future is first polled. On a miss the
/// wrapped function is only invoked once that future is polled, and its value
/// is stored only if it resolves to `Ok`. Dropping the future early leaves the
/// cache untouched; the miss stays counted.
pub struct AsyncMemoized<A: CacheKey, V, E, F> {
    state: Arc<MemoState<A::Key, V>>,
    func: Arc<F>,
    _call: PhantomData<fn(A) -> std::result::Result<V, E>>,
}

impl<A, V, E, F, Fut> AsyncMemoized<A, V, E, F>
where
    A: CacheKey + Send + 'static,
    V: Clone + Send + 'static,
    E: From<CacheError> + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
{
    /// Wraps `func`, naming the cache after its Rust path.
    pub fn new(capacity: usize, ttl: Option<Duration>, func: F) -> Result<Self> {
        Self::named(type_name::<F>(), capacity, ttl, func)
    }

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
    /// Returns a future resolving to the cached or freshly computed result.
    pub fn call(&self, args: A) -> BoxFuture<'static, std::result::Result<V, E>> {
        let key = match args.cache_key() {
            Ok(key) => key,
            Err(err) => return future::ready(Err(E::from(err))).boxed(),
        };

        if let Some(value) = self.state.lookup(&key) {
            return future::ready(Ok(value)).boxed();
        }

        let func = Arc::clone(&self.func);
        let state = Arc::clone(&self.state);

        async move {
            let value = func(args).await?;
            state.store(key, value.clone());
            Ok::<V, E>(value)
        }
        .boxed()
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

impl<A, V, E, F, Fut> Invoke<A> for AsyncMemoized<A, V, E, F>
where
    A: CacheKey + Send + 'static,
    V: Clone + Send + 'static,
    E: From<CacheError> + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
{
    type Output = BoxFuture<'static, std::result::Result<V, E>>;

    fn invoke(&self, args: A) -> Self::Output {
        self.call(args)
    }
}

impl<A: CacheKey, V, E, F> Clone for AsyncMemoized<A, V, E, F> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            func: Arc::clone(&self.func),
            _call: PhantomData,
        }
    }
}

impl<A: CacheKey, V, E, F> fmt::Debug for AsyncMemoized<A, V, E, F>
where
    V: Send,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncMemoized")
            .field("name", &self.state.name())
            .field("info", &self.state.cache_info())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::oneshot;

    fn counting_square(
        calls: Arc<AtomicUsize>,
    ) -> impl Fn(u64) -> BoxFuture<'static, std::result::Result<u64, CacheError>> + Send + Sync
    {
        move |n| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
                Ok(n * n)
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_repeated_calls_hit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let square =
            AsyncMemoized::named("square", 8, None, counting_square(calls.clone())).unwrap();

        assert_eq!(square.call(4).await.unwrap(), 16);
        assert_eq!(square.call(4).await.unwrap(), 16);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let info = square.cache_info();
        assert_eq!(info.hits, 1);
        assert_eq!(info.misses, 1);
        assert_eq!(info.currsize, 1);
    }

    #[tokio::test]
    async fn test_lru_scenario() {
        let calls = Arc::new(AtomicUsize::new(0));
        let f = AsyncMemoized::named("scenario", 2, None, counting_square(calls)).unwrap();

        for n in [1, 2, 1, 3, 2] {
            f.call(n).await.unwrap();
        }

        assert_eq!(
            f.cache_info(),
            CacheInfo {
                hits: 1,
                misses: 4,
                maxsize: 2,
                currsize: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_miss_counted_before_poll() {
        let calls = Arc::new(AtomicUsize::new(0));
        let f = AsyncMemoized::named("eager", 4, None, counting_square(calls.clone())).unwrap();

        let pending = f.call(3);

        // Decided and counted, but the wrapped function has not run yet
        assert_eq!(f.cache_info().misses, 1);
        assert_eq!(f.cache_info().currsize, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(pending.await.unwrap(), 9);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.cache_info().currsize, 1);
    }

    #[tokio::test]
    async fn test_dropped_future_stores_nothing() {
        let (release, gate) = oneshot::channel::<()>();
        let gate = Arc::new(tokio::sync::Mutex::new(Some(gate)));

        let f = AsyncMemoized::named("cancelled", 4, None, move |n: u32| {
            let gate = gate.clone();
            async move {
                if let Some(rx) = gate.lock().await.take() {
                    let _ = rx.await;
                }
                Ok::<_, CacheError>(n)
            }
        })
        .unwrap();

        let pending = f.call(7);
        let aborted = tokio::time::timeout(Duration::from_millis(20), pending).await;
        assert!(aborted.is_err());

        assert_eq!(f.cache_info().misses, 1);
        assert_eq!(f.cache_info().currsize, 0);

        drop(release);
        assert_eq!(f.call(7).await.unwrap(), 7);
        assert_eq!(f.cache_info().misses, 2);
        assert_eq!(f.cache_info().currsize, 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let f = AsyncMemoized::named("flaky", 4, None, move |n: u32| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(CacheError::NotFound(format!("session {}", n)))
                } else {
                    Ok(n)
                }
            }
        })
        .unwrap();

        assert!(matches!(f.call(1).await, Err(CacheError::NotFound(_))));
        assert_eq!(f.cache_info().misses, 1);
        assert_eq!(f.cache_info().currsize, 0);

        assert_eq!(f.call(1).await.unwrap(), 1);
        assert_eq!(f.cache_info().misses, 2);
        assert_eq!(f.cache_info().currsize, 1);
    }

    #[tokio::test]
    async fn test_key_failure_resolves_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let f = AsyncMemoized::named("nan", 4, None, move |x: f64| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, CacheError>(x) }
        })
        .unwrap();

        assert!(matches!(
            f.call(f64::NAN).await,
            Err(CacheError::KeyDerivation(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.cache_info().misses, 0);
    }

    #[tokio::test]
    async fn test_concurrent_misses_may_duplicate_work() {
        let calls = Arc::new(AtomicUsize::new(0));
        let f = AsyncMemoized::named("stampede", 4, None, counting_square(calls.clone())).unwrap();

        let (a, b) = tokio::join!(f.call(5), f.invoke(5));

        assert_eq!(a.unwrap(), 25);
        assert_eq!(b.unwrap(), 25);
        assert_eq!(f.cache_info().misses, 2);
        assert_eq!(f.cache_info().currsize, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cache_clear() {
        let calls = Arc::new(AtomicUsize::new(0));
        let f = AsyncMemoized::named("clear", 3, None, counting_square(calls)).unwrap();

        f.call(1).await.unwrap();
        f.call(1).await.unwrap();
        f.cache_clear();

        assert_eq!(
            f.cache_info(),
            CacheInfo {
                hits: 0,
                misses: 0,
                maxsize: 3,
                currsize: 0,
            }
        );
    }
}

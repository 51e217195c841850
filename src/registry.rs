//! Cache Registry
//!
//! Process-wide index of memoized functions by name, used by management
//! operations that inspect or reset every cache at once.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::cache::CacheInfo;
use crate::memo::CacheControl;

static GLOBAL_REGISTRY: Lazy<CacheRegistry> = Lazy::new(CacheRegistry::new);

/// Returns the registry every `memoize*` call registers into.
pub fn global() -> &'static CacheRegistry {
    &GLOBAL_REGISTRY
}

/// Clears every cache in the global registry.
pub fn clear_all_caches() -> usize {
    global().clear_all()
}

/// Statistics of every cache in the global registry, keyed by name.
pub fn all_cache_info() -> BTreeMap<String, CacheInfo> {
    global().info_all()
}

// == Cache Registry ==
/// Name to cache map behind a single lock.
///
/// Entries are never removed. Registering an existing name replaces the
/// previous cache. Cloning shares the same map.
#[derive(Clone, Default)]
pub struct CacheRegistry {
    caches: Arc<RwLock<BTreeMap<String, Arc<dyn CacheControl>>>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == Register ==
    /// Adds `cache` under `name`, replacing any cache already registered there.
    pub fn register(&self, name: impl Into<String>, cache: Arc<dyn CacheControl>) {
        let name = name.into();
        let mut caches = self.caches.write();

        if caches.insert(name.clone(), cache).is_some() {
            debug!(cache = %name, "replaced previously registered cache");
        }
    }

    // == Clear All ==
    /// Clears every registered cache and returns how many were cleared.
    pub fn clear_all(&self) -> usize {
        let caches = self.caches.read();

        for cache in caches.values() {
            cache.cache_clear();
        }

        info!("Cleared {} registered caches", caches.len());
        caches.len()
    }

    // == Info All ==
    /// Snapshot of every registered cache's statistics.
    pub fn info_all(&self) -> BTreeMap<String, CacheInfo> {
        self.caches
            .read()
            .iter()
            .map(|(name, cache)| (name.clone(), cache.cache_info()))
            .collect()
    }

    pub fn info(&self, name: &str) -> Option<CacheInfo> {
        self.caches.read().get(name).map(|cache| cache.cache_info())
    }

    /// Clears one cache. Returns false if no cache has that name.
    pub fn clear(&self, name: &str) -> bool {
        match self.caches.read().get(name) {
            Some(cache) => {
                cache.cache_clear();
                true
            }
            None => false,
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.caches.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.caches.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.read().is_empty()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("caches", &self.names())
            .finish()
    }
}

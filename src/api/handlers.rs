//! API Handlers
//!
//! HTTP request handlers for the cache admin endpoints.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::CacheInfo;
use crate::error::{CacheError, Result};
use crate::models::{ClearResponse, HealthResponse};
use crate::registry::{self, CacheRegistry};

/// Application state shared across all handlers.
///
/// Holds the registry the admin endpoints operate on. The registry handle is
/// cheap to clone and shares one map.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Registry of memoized caches
    pub registry: CacheRegistry,
}

impl AppState {
    /// Creates a new AppState over the given registry.
    pub fn new(registry: CacheRegistry) -> Self {
        Self { registry }
    }

    /// Creates an AppState over the process-wide registry.
    pub fn global() -> Self {
        Self::new(registry::global().clone())
    }
}

/// Handler for GET /caches
///
/// Returns statistics of every registered cache keyed by name.
pub async fn list_caches_handler(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, CacheInfo>> {
    Json(state.registry.info_all())
}

/// Handler for DELETE /caches
///
/// Clears every registered cache.
pub async fn clear_caches_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let cleared = state.registry.clear_all();
    Json(ClearResponse::all(cleared))
}

/// Handler for GET /caches/:name
pub async fn cache_info_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CacheInfo>> {
    state
        .registry
        .info(&name)
        .map(Json)
        .ok_or(CacheError::NotFound(name))
}

/// Handler for DELETE /caches/:name
pub async fn clear_cache_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ClearResponse>> {
    if !state.registry.clear(&name) {
        return Err(CacheError::NotFound(name));
    }

    Ok(Json(ClearResponse::single(&name)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

//! API Module
//!
//! HTTP handlers and routing for the cache admin API.
//!
//! # Endpoints
//! - `GET /caches` - Statistics of every registered cache
//! - `DELETE /caches` - Clear every registered cache
//! - `GET /caches/:name` - Statistics of one cache
//! - `DELETE /caches/:name` - Clear one cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

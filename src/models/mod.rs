//! Response models for the admin API
//!
//! This module defines the DTOs (Data Transfer Objects) serialized into
//! HTTP response bodies. Cache statistics are served as [`crate::cache::CacheInfo`].

pub mod responses;

pub use responses::{ClearResponse, HealthResponse};

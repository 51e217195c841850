//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for clear operations (DELETE /caches, DELETE /caches/:name)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// Number of caches that were cleared
    pub cleared: usize,
}

impl ClearResponse {
    /// Response for a whole-registry clear
    pub fn all(cleared: usize) -> Self {
        Self {
            message: format!("Cleared {} caches", cleared),
            cleared,
        }
    }

    /// Response for clearing one named cache
    pub fn single(name: &str) -> Self {
        Self {
            message: format!("Cache '{}' cleared", name),
            cleared: 1,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_all_response_serialize() {
        let resp = ClearResponse::all(3);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["cleared"], 3);
        assert_eq!(json["message"], "Cleared 3 caches");
    }

    #[test]
    fn test_clear_single_response() {
        let resp = ClearResponse::single("sessions");
        assert_eq!(resp.cleared, 1);
        assert!(resp.message.contains("sessions"));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}

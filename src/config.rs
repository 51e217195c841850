//! Configuration Module
//!
//! Handles loading host configuration from environment variables.

use std::env;
use std::time::Duration;

/// Host configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Admin HTTP server port
    pub server_port: u16,
    /// Capacity of the host's built-in memoized caches
    pub default_capacity: usize,
    /// TTL in seconds of the host's built-in caches, 0 = never expire
    pub default_ttl: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - Admin HTTP server port (default: 3000)
    /// - `DEFAULT_CAPACITY` - Entries per built-in cache (default: 1024)
    /// - `DEFAULT_TTL` - Entry lifetime in seconds, 0 disables expiry (default: 3600)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            default_capacity: env::var("DEFAULT_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.default_capacity),
            default_ttl: env::var("DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_ttl),
        }
    }

    /// Configured TTL as a duration, None when expiry is disabled.
    pub fn default_ttl(&self) -> Option<Duration> {
        match self.default_ttl {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            default_capacity: 1024,
            default_ttl: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.default_capacity, 1024);
        assert_eq!(config.default_ttl, 3600);
        assert_eq!(config.default_ttl(), Some(Duration::from_secs(3600)));
    }

    #[test]
    fn test_config_zero_ttl_disables_expiry() {
        let config = Config {
            default_ttl: 0,
            ..Config::default()
        };
        assert_eq!(config.default_ttl(), None);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SERVER_PORT");
        env::remove_var("DEFAULT_CAPACITY");
        env::remove_var("DEFAULT_TTL");

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.default_capacity, 1024);
        assert_eq!(config.default_ttl, 3600);
    }
}

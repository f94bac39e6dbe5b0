//! # Simulator Configuration
//!
//! Environment-based configuration for the scenario runner.

use std::env;
use std::time::Duration;

/// Runner configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Logging level used when `RUST_LOG` is unset
    pub log_level: String,

    /// Emit JSON log lines
    pub log_json: bool,

    /// Redis cache tier; the cache tier is in-memory when unset
    pub redis_url: Option<String>,

    /// Key prefix for the Redis cache tier
    pub cache_namespace: String,

    /// Expiry of cache entries
    pub cache_ttl: Option<Duration>,

    /// Age after which a cached book is no longer served as valid
    pub max_age: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            log_json: env::var("LOG_JSON")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),

            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),

            cache_namespace: env::var("CACHE_NAMESPACE")
                .unwrap_or_else(|_| "tierstore:books".to_string()),

            cache_ttl: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs),

            max_age: env::var("CACHE_MAX_AGE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map_or(Duration::from_secs(300), Duration::from_secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

//! Weather cache configuration.

use std::{env, time::Duration};

/// Twelve hours, the lifetime of a cached weather answer
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 12 * 60 * 60;

/// Longest accepted TTL (30 days); larger values are clamped
pub const MAX_CACHE_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;

/// Configuration for the in-memory weather cache
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    /// How often the background sweeper drops expired entries
    pub sweep_interval_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            sweep_interval_seconds: 600,
        }
    }
}

impl CacheConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let ttl_seconds = env::var("WEATHER_CACHE_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(|v| v.min(MAX_CACHE_TTL_SECONDS))
            .unwrap_or(defaults.ttl_seconds);

        let sweep_interval_seconds = env::var("WEATHER_CACHE_SWEEP_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.sweep_interval_seconds);

        Self {
            ttl_seconds,
            sweep_interval_seconds,
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds.min(MAX_CACHE_TTL_SECONDS))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

//! Rate limiting configuration.

use std::{env, time::Duration};

/// Configuration for the per-client fixed-window rate limiter
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Permits granted to one client within a single window
    pub requests: usize,
    pub period_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests: 15,
            period_seconds: 60,
        }
    }
}

impl RateLimitConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let requests = env::var("RATE_LIMIT_REQUESTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.requests);

        let period_seconds = env::var("RATE_LIMIT_PERIOD")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.period_seconds);

        Self {
            requests,
            period_seconds,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.period_seconds)
    }
}

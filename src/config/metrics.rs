//! Metrics configuration.

use std::env;

/// Configuration for Prometheus metrics exposure
#[derive(Clone, Debug)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let enabled = match env::var("METRICS_ENABLED")
            .map(|v| v.trim().to_lowercase())
            .as_deref()
        {
            Ok("false") | Ok("0") | Ok("off") => false,
            _ => true,
        };

        Self { enabled }
    }
}

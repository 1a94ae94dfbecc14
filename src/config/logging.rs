//! Log output configuration.

use std::env;

/// Output encoding for tracing events
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, for local development
    Pretty,
    /// One JSON object per line, for log shippers
    Json,
}

/// Configuration for the tracing subscriber
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            default_filter: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let format = match env::var("LOG_FORMAT")
            .map(|v| v.to_lowercase())
            .as_deref()
        {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            format,
            ..Self::default()
        }
    }
}

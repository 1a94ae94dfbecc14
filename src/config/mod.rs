//! Configuration structures and loading utilities.
//!
//! Every concern gets its own `*Config` with a `Default` and a `from_env()`
//! loader; [`Settings`] gathers them for the binary.

pub mod cache;
pub mod logging;
pub mod metrics;
pub mod provider;
pub mod rate_limit;
pub mod server;

pub use cache::*;
pub use logging::*;
pub use metrics::*;
pub use provider::*;
pub use rate_limit::*;
pub use server::*;

/// All runtime configuration, loaded once at startup
#[derive(Clone, Debug, Default)]
pub struct Settings {
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
    pub metrics: MetricsConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            provider: ProviderConfig::from_env(),
            cache: CacheConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            metrics: MetricsConfig::from_env(),
            server: ServerConfig::from_env(),
            logging: LoggingConfig::from_env(),
        }
    }
}

// Tests that touch process environment variables take this lock.
#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

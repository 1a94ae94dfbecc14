//! Observation hooks for the weather lookup path.

use crate::errors::ProviderError;
use std::time::Duration;

/// Receives notifications from [`WeatherService`](super::WeatherService).
///
/// All methods default to no-ops so implementors pick what they care about.
/// Implementations run inline on the request path and must not block.
pub trait WeatherEvents: Send + Sync {
    fn cache_hit(&self, _key: &str) {}

    fn cache_miss(&self, _key: &str) {}

    fn provider_succeeded(&self, _city: &str, _elapsed: Duration) {}

    fn provider_failed(&self, _city: &str, _error: &ProviderError, _elapsed: Duration) {}
}

//! Cache-aside weather lookups.

use crate::{
    errors::{ProviderError, WeatherError},
    models::{WeatherQuery, WeatherResult},
    services::{cache::WeatherCache, events::WeatherEvents, provider::WeatherProvider},
};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{debug, error, warn};

/// Where a lookup's answer came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// A successful lookup together with its cache outcome
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeatherLookup {
    pub result: WeatherResult,
    pub cache: CacheStatus,
}

/// Resolves current weather for a city, consulting the cache before the provider.
///
/// Concurrent misses for the same city are not coalesced; each calls the
/// provider and the last successful write wins.
#[derive(Clone)]
pub struct WeatherService {
    cache: Arc<WeatherCache>,
    provider: Arc<dyn WeatherProvider>,
    ttl: Duration,
    events: Option<Arc<dyn WeatherEvents>>,
}

impl WeatherService {
    pub fn new(
        cache: Arc<WeatherCache>,
        provider: Arc<dyn WeatherProvider>,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            provider,
            ttl,
            events: None,
        }
    }

    /// Attach an observer for cache and provider outcomes
    pub fn with_events(mut self, events: Arc<dyn WeatherEvents>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn cache(&self) -> &Arc<WeatherCache> {
        &self.cache
    }

    /// Current weather for `city`
    pub async fn get_current_weather(&self, city: &str) -> Result<WeatherResult, WeatherError> {
        self.lookup(city).await.map(|lookup| lookup.result)
    }

    /// Current weather for `city`, reporting whether the cache answered
    pub async fn lookup(&self, city: &str) -> Result<WeatherLookup, WeatherError> {
        let query = WeatherQuery::parse(city)?;

        if let Some(result) = self.cache.get(query.key()) {
            debug!(key = query.key(), "Weather cache hit");
            self.emit(|events| events.cache_hit(query.key()));
            return Ok(WeatherLookup {
                result,
                cache: CacheStatus::Hit,
            });
        }

        debug!(key = query.key(), "Weather cache miss");
        self.emit(|events| events.cache_miss(query.key()));

        let started = Instant::now();
        let outcome = self.provider.fetch(query.raw()).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(result) => {
                self.emit(|events| events.provider_succeeded(query.display(), elapsed));
                self.cache.put(query.key(), result.clone(), self.ttl);
                Ok(WeatherLookup {
                    result,
                    cache: CacheStatus::Miss,
                })
            }
            Err(ProviderError::NoData) => {
                self.emit(|events| {
                    events.provider_failed(query.display(), &ProviderError::NoData, elapsed)
                });
                warn!(city = query.display(), "Weather provider had no data for city");
                Err(WeatherError::NotFound(query.display().to_string()))
            }
            Err(e) => {
                self.emit(|events| events.provider_failed(query.display(), &e, elapsed));
                error!(
                    city = query.display(),
                    kind = e.kind(),
                    error = %e,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Weather provider request failed"
                );
                Err(WeatherError::Upstream(e))
            }
        }
    }

    fn emit(&self, notify: impl FnOnce(&dyn WeatherEvents)) {
        if let Some(events) = &self.events {
            notify(events.as_ref());
        }
    }
}

//! OpenAPI specification generation and app factory.

use crate::{
    config::{MetricsConfig, Settings},
    errors::StartupError,
    handlers::{get_metrics, health, version, weather, weather_missing_city},
    middleware::{MetricsMiddleware, RequestIdMiddleware},
    services::{
        AppMetrics, SimpleRateLimiter, VisualCrossingProvider, WeatherCache, WeatherEvents,
        WeatherProvider, WeatherService,
    },
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};
use std::sync::Arc;

/// Creates the OpenAPI specification served at `/api/spec/v2`
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "City Weather API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "Current weather lookups by city name.\n\n\
                ## Weather lookups\n\
                `GET /weather/{city}` returns `{ city, temperatureC, temperatureF, summary }`.\n\
                City names are matched case-insensitively and cached for 12 hours by default; \
                the `X-Cache` response header reports `HIT` or `MISS`.\n\
                \n\
                ## Errors\n\
                Every error body has the shape `{ \"error\": string, \"message\": string }`:\n\
                - `400 Invalid Input`: the city is empty or blank\n\
                - `404 NotFound`: the weather provider has no data for the city\n\
                - `429 TooManyRequests`: per-client rate limit exceeded, see `Retry-After`\n\
                - `502 UpstreamWeatherError`: the weather provider failed or is not configured\n\
                \n\
                ## Rate limiting\n\
                Weather routes allow `RATE_LIMIT_REQUESTS` requests (default 15) per client per \
                `RATE_LIMIT_PERIOD` seconds (default 60). Health, version, and metrics are exempt."
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Shared application state, built once and cloned into every worker
#[derive(Clone)]
pub struct AppState {
    pub weather: web::Data<WeatherService>,
    pub limiter: web::Data<SimpleRateLimiter>,
    pub metrics: web::Data<AppMetrics>,
    pub metrics_config: web::Data<MetricsConfig>,
}

impl AppState {
    /// Wire the production Visual Crossing provider
    pub fn from_settings(settings: &Settings) -> Result<Self, StartupError> {
        let provider = VisualCrossingProvider::new(&settings.provider)?;
        Self::with_provider(settings, Arc::new(provider))
    }

    /// Wire an arbitrary provider; the cache, limiter, and metrics come from `settings`
    pub fn with_provider(
        settings: &Settings,
        provider: Arc<dyn WeatherProvider>,
    ) -> Result<Self, StartupError> {
        let metrics = Arc::new(AppMetrics::new()?);
        let events: Arc<dyn WeatherEvents> = metrics.clone();

        let service = WeatherService::new(
            Arc::new(WeatherCache::new()),
            provider,
            settings.cache.ttl(),
        )
        .with_events(events);

        Ok(Self {
            weather: web::Data::new(service),
            limiter: web::Data::new(SimpleRateLimiter::new(settings.rate_limit.clone())),
            metrics: web::Data::from(metrics),
            metrics_config: web::Data::new(settings.metrics.clone()),
        })
    }

    pub fn cache(&self) -> Arc<WeatherCache> {
        Arc::clone(self.weather.cache())
    }
}

/// Creates the application from shared state
///
/// The app carries:
/// - the weather endpoint, rate limited per client
/// - health, version, and Prometheus metrics endpoints
/// - request ID and metrics middleware
/// - the OpenAPI document at `/api/spec/v2`
///
/// Used by the server binary for every worker and directly by tests.
pub fn create_app(
    state: AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(MetricsMiddleware)
        .wrap(RequestIdMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(state.weather)
        .app_data(state.limiter)
        .app_data(state.metrics)
        .app_data(state.metrics_config)
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .service(web::resource("/weather/{city}").route(web::get().to(weather)))
        .service(web::resource("/weather").route(web::get().to(weather_missing_city)))
        .service(web::resource("/weather/").route(web::get().to(weather_missing_city)))
        .with_json_spec_at("/api/spec/v2")
        .build()
}

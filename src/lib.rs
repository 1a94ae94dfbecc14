//! City Weather API - current weather lookups by city name
//!
//! An Actix Web service that answers `GET /weather/{city}` from a
//! process-local cache, falling back to the Visual Crossing weather API on a
//! miss. Requests are rate limited per client before any lookup happens.
//!
//! ## Architecture
//!
//! - `models/` - Domain values (`WeatherQuery`, `WeatherResult`) and response bodies
//! - `errors` - Provider failure kinds and the lookup outcomes they collapse into
//! - `services/` - Cache, provider, cache-aside orchestration, rate limiting, metrics
//! - `handlers/` - HTTP handlers, OpenAPI document, and the app factory
//! - `middleware/` - Request IDs and request metrics
//! - `config/` - Environment-driven configuration
//! - `telemetry` - Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```no_run
//! use actix_web::HttpServer;
//! use city_weather_api::{AppState, Settings, create_app};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let settings = Settings::from_env();
//!     let state = AppState::from_settings(&settings).map_err(std::io::Error::other)?;
//!     HttpServer::new(move || create_app(state.clone()))
//!         .bind(settings.server.bind_address.as_str())?
//!         .run()
//!         .await
//! }
//! ```

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

pub use config::{
    CacheConfig, LoggingConfig, MetricsConfig, ProviderConfig, RateLimitConfig, ServerConfig,
    Settings,
};
pub use errors::{ProviderError, StartupError, WeatherError};
pub use handlers::{
    AppState, create_app, create_openapi_spec, get_metrics, health, version, weather,
    weather_missing_city,
};
pub use middleware::{MetricsMiddleware, RequestIdMiddleware};
pub use models::{ErrorResponse, HealthResponse, VersionResponse, WeatherQuery, WeatherResult};
pub use services::{
    AppMetrics, CacheStatus, SimpleRateLimiter, VisualCrossingProvider, WeatherCache,
    WeatherEvents, WeatherLookup, WeatherProvider, WeatherService,
};

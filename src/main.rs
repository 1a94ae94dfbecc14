use actix_web::HttpServer;
use city_weather_api::{
    AppState, Settings, create_app, services::spawn_cache_sweeper, telemetry,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = Settings::from_env();

    telemetry::init_tracing(&settings.logging).map_err(std::io::Error::other)?;

    let state = AppState::from_settings(&settings).map_err(|e| {
        tracing::error!(error = %e, "Failed to initialise application state");
        std::io::Error::other(e)
    })?;

    spawn_cache_sweeper(state.cache(), settings.cache.sweep_interval());

    tracing::info!(
        bind_address = %settings.server.bind_address,
        provider_configured = settings.provider.is_configured(),
        cache_ttl_seconds = settings.cache.ttl_seconds,
        rate_limit_requests = settings.rate_limit.requests,
        rate_limit_period_seconds = settings.rate_limit.period_seconds,
        "Starting city weather API"
    );

    HttpServer::new(move || create_app(state.clone()))
        .bind(settings.server.bind_address.as_str())?
        .run()
        .await
}

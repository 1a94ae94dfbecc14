//! Weather endpoint handler.

use crate::{
    errors::WeatherError,
    models::ErrorResponse,
    services::{
        rate_limit::{SimpleRateLimiter, rate_limit_middleware},
        weather::WeatherService,
    },
};
use actix_web::{
    Error, HttpRequest, HttpResponse, ResponseError, Result, http::StatusCode, web,
};
use paperclip::actix::api_v2_operation;

/// Response header telling clients whether the cache answered (`HIT`/`MISS`)
pub const CACHE_STATUS_HEADER: &str = "X-Cache";

const UPSTREAM_MESSAGE: &str = "Failed to retrieve weather from external provider.";

impl ResponseError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            WeatherError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            WeatherError::NotFound(_) => StatusCode::NOT_FOUND,
            WeatherError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Provider detail stays in the logs; clients get a fixed message
        let body = match self {
            WeatherError::InvalidInput(message) => ErrorResponse::new("Invalid Input", message),
            WeatherError::NotFound(_) => ErrorResponse::new("NotFound", self.to_string()),
            WeatherError::Upstream(_) => {
                ErrorResponse::new("UpstreamWeatherError", UPSTREAM_MESSAGE)
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Current weather endpoint
///
/// Rate limited per client. Answers from the in-memory cache when it can and
/// asks the upstream provider otherwise.
#[api_v2_operation(
    summary = "Current Weather For A City",
    description = "Returns current temperature (Celsius and Fahrenheit) and a condition summary for the city in the path. Responses carry `X-Cache: HIT|MISS`. Errors: 400 for a blank city, 404 when the provider has no data for it, 429 when the client exceeds its rate limit, 502 when the upstream provider fails.",
    tags("Weather")
)]
pub async fn weather(req: HttpRequest, city: web::Path<String>) -> Result<HttpResponse, Error> {
    if let Err(response) = admit(&req) {
        return Ok(response);
    }

    let service = weather_service(&req)?;
    let lookup = service.lookup(city.as_str()).await?;

    Ok(HttpResponse::Ok()
        .insert_header((CACHE_STATUS_HEADER, lookup.cache.as_str()))
        .json(lookup.result))
}

/// `/weather` and `/weather/` with no city segment
#[api_v2_operation(
    summary = "Missing City",
    description = "Always rejects the request with 400 because no city was given.",
    tags("Weather")
)]
pub async fn weather_missing_city(req: HttpRequest) -> Result<HttpResponse, Error> {
    if let Err(response) = admit(&req) {
        return Ok(response);
    }

    Err(WeatherError::InvalidInput("City must not be empty.".to_string()).into())
}

fn admit(req: &HttpRequest) -> Result<(), HttpResponse> {
    match req.app_data::<web::Data<SimpleRateLimiter>>() {
        Some(limiter) => rate_limit_middleware(req, limiter),
        None => Ok(()),
    }
}

fn weather_service(req: &HttpRequest) -> Result<&web::Data<WeatherService>, Error> {
    req.app_data::<web::Data<WeatherService>>().ok_or_else(|| {
        tracing::error!("Weather service missing from app data");
        actix_web::error::ErrorServiceUnavailable("Weather service not available")
    })
}

//! Error taxonomy for weather retrieval.
//!
//! Providers report granular [`ProviderError`] kinds. [`WeatherService`]
//! collapses them into the three outcomes of [`WeatherError`], which is all
//! the HTTP layer ever needs to map to a status code.
//!
//! [`WeatherService`]: crate::services::WeatherService

/// Failures raised by a [`WeatherProvider`](crate::services::WeatherProvider)
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Weather provider is not configured: {0}")]
    Misconfigured(String),

    #[error("Weather provider unreachable: {0}")]
    Unavailable(#[source] reqwest::Error),

    #[error("Weather provider returned status {0}")]
    BadStatus(u16),

    #[error("Weather provider returned an unreadable payload: {0}")]
    MalformedPayload(String),

    #[error("Weather provider returned no usable temperature")]
    NoData,
}

impl ProviderError {
    /// Short label for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Misconfigured(_) => "misconfigured",
            ProviderError::Unavailable(_) => "unavailable",
            ProviderError::BadStatus(_) | ProviderError::MalformedPayload(_) => "bad_response",
            ProviderError::NoData => "no_data",
        }
    }
}

/// Outcomes of a weather lookup that callers must handle
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// The request itself is unusable; retrying will not help
    #[error("{0}")]
    InvalidInput(String),

    /// The provider answered but knows nothing about the city
    #[error("No weather data found for '{0}'.")]
    NotFound(String),

    /// The provider could not be reached or answered badly
    #[error("Upstream weather provider failed: {0}")]
    Upstream(#[from] ProviderError),
}

/// Failures while assembling the application at startup
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to build weather provider HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("failed to register metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}

//! Upstream weather provider integration.
//!
//! [`VisualCrossingProvider`] talks to the Visual Crossing timeline API. The
//! payload is read through [`ProviderRawResponse`], a lenient view that
//! matches field names case-insensitively and ignores anything it does not
//! know, so small upstream schema drift does not break lookups.

use crate::{config::ProviderConfig, errors::ProviderError, models::WeatherResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use std::ops::RangeInclusive;
use tracing::{debug, warn};
use url::Url;

/// Summary used when the upstream payload carries no condition text
pub const NO_DESCRIPTION: &str = "No description";

/// Air temperatures outside this range (°C) are treated as a corrupt payload
pub const PLAUSIBLE_CELSIUS: RangeInclusive<f64> = -100.0..=100.0;

/// Source of current weather for a city
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch current conditions for `city`, exactly as the caller typed it
    async fn fetch(&self, city: &str) -> Result<WeatherResult, ProviderError>;
}

/// Weather provider backed by the Visual Crossing timeline API
pub struct VisualCrossingProvider {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl VisualCrossingProvider {
    /// Create a provider from configuration.
    ///
    /// Missing credentials are not an error here; they surface as
    /// [`ProviderError::Misconfigured`] on every fetch.
    pub fn new(config: &ProviderConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        if !config.is_configured() {
            warn!(
                base_url_set = config.base_url.is_some(),
                api_key_set = config.api_key.is_some(),
                "Weather provider is not configured; lookups will fail"
            );
        }

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Build `{base}/{city}?unitGroup=metric&key=..&contentType=json`
    fn request_url(&self, city: &str) -> Result<Url, ProviderError> {
        let (Some(base_url), Some(api_key)) = (&self.base_url, &self.api_key) else {
            return Err(ProviderError::Misconfigured(
                "base URL and API key are required".to_string(),
            ));
        };

        let mut url = Url::parse(base_url)
            .map_err(|e| ProviderError::Misconfigured(format!("invalid base URL: {e}")))?;

        url.path_segments_mut()
            .map_err(|_| ProviderError::Misconfigured("base URL cannot take a path".to_string()))?
            .pop_if_empty()
            .push(city);

        url.query_pairs_mut()
            .append_pair("unitGroup", "metric")
            .append_pair("key", api_key)
            .append_pair("contentType", "json");

        Ok(url)
    }
}

#[async_trait]
impl WeatherProvider for VisualCrossingProvider {
    async fn fetch(&self, city: &str) -> Result<WeatherResult, ProviderError> {
        let url = self.request_url(city)?;
        debug!(host = url.host_str().unwrap_or("unknown"), city, "Requesting current weather");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ProviderError::Unavailable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::BadStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(ProviderError::Unavailable)?;
        let payload = ProviderRawResponse::from_slice(&body)?;

        payload.into_result(city)
    }
}

/// Temperature and condition text from one section of the payload
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawConditions {
    pub temp: Option<f64>,
    pub conditions: Option<String>,
}

impl RawConditions {
    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            temp: field(object, "temp").and_then(Value::as_f64),
            conditions: non_blank_str(field(object, "conditions")),
        }
    }
}

/// The parts of a timeline response the lookup cares about
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProviderRawResponse {
    pub resolved_address: Option<String>,
    pub current_conditions: Option<RawConditions>,
    pub days: Vec<RawConditions>,
}

impl ProviderRawResponse {
    /// Parse a response body; anything but a JSON object is malformed
    pub fn from_slice(body: &[u8]) -> Result<Self, ProviderError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ProviderError::MalformedPayload(e.to_string()))?;

        let Value::Object(root) = value else {
            return Err(ProviderError::MalformedPayload(
                "expected a JSON object".to_string(),
            ));
        };

        let current_conditions = field(&root, "currentConditions")
            .and_then(Value::as_object)
            .map(RawConditions::from_object);

        let days = field(&root, "days")
            .and_then(Value::as_array)
            .map(|days| {
                days.iter()
                    .filter_map(Value::as_object)
                    .map(RawConditions::from_object)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            resolved_address: non_blank_str(field(&root, "resolvedAddress")),
            current_conditions,
            days,
        })
    }

    /// Current conditions first, then the first forecast day
    pub fn temperature(&self) -> Option<f64> {
        self.current_conditions
            .as_ref()
            .and_then(|c| c.temp)
            .or_else(|| self.days.first().and_then(|d| d.temp))
    }

    pub fn summary(&self) -> &str {
        self.current_conditions
            .as_ref()
            .and_then(|c| c.conditions.as_deref())
            .or_else(|| self.days.first().and_then(|d| d.conditions.as_deref()))
            .unwrap_or(NO_DESCRIPTION)
    }

    /// Resolve into a domain result; a payload with no temperature is `NoData`
    pub fn into_result(self, query: &str) -> Result<WeatherResult, ProviderError> {
        let celsius = self.temperature().ok_or(ProviderError::NoData)?;
        if !PLAUSIBLE_CELSIUS.contains(&celsius) {
            return Err(ProviderError::MalformedPayload(format!(
                "temperature {celsius} is out of range"
            )));
        }
        let summary = self.summary().to_string();
        let city = self.resolved_address.unwrap_or_else(|| query.to_string());

        Ok(WeatherResult::new(city, celsius.round() as i32, summary))
    }
}

/// Case-insensitive object lookup, preferring an exact match
fn field<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object
        .get(name)
        .or_else(|| {
            object
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
        .filter(|value| !value.is_null())
}

fn non_blank_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

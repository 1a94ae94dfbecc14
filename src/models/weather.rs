//! Weather domain types shared by the provider, cache, and service layers.

use crate::errors::WeatherError;
use paperclip::actix::Apiv2Schema;
use serde::Serialize;

/// Divisor of the legacy Celsius to Fahrenheit conversion.
///
/// Fahrenheit is `32 + floor(c / 0.5556)`, which is not `c * 9 / 5 + 32`.
pub const FAHRENHEIT_DIVISOR: f64 = 0.5556;

/// Derive Fahrenheit from an integral Celsius reading, saturating at the `i32` bounds
pub fn celsius_to_fahrenheit(celsius: i32) -> i32 {
    let fahrenheit = 32 + (f64::from(celsius) / FAHRENHEIT_DIVISOR).floor() as i64;
    fahrenheit.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// A validated city lookup.
///
/// Keeps the caller's text untouched for the upstream provider and a
/// trimmed, lower-cased key for cache addressing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeatherQuery {
    raw: String,
    key: String,
}

impl WeatherQuery {
    /// Validate raw input; blank or whitespace-only text is rejected
    pub fn parse(raw: &str) -> Result<Self, WeatherError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WeatherError::InvalidInput(
                "City must not be empty.".to_string(),
            ));
        }

        Ok(Self {
            raw: raw.to_string(),
            key: trimmed.to_lowercase(),
        })
    }

    /// Text exactly as the caller supplied it
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Display form without surrounding whitespace
    pub fn display(&self) -> &str {
        self.raw.trim()
    }

    /// Case-insensitive cache key
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Current conditions for a city, as returned to API clients
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Apiv2Schema)]
pub struct WeatherResult {
    /// Provider-resolved location name (e.g. "London, England, United Kingdom")
    #[serde(rename = "city")]
    resolved_city: String,
    #[serde(rename = "temperatureC")]
    temperature_c: i32,
    #[serde(rename = "temperatureF")]
    temperature_f: i32,
    /// Short condition text (e.g. "Partially cloudy")
    summary: String,
}

impl WeatherResult {
    pub fn new(
        resolved_city: impl Into<String>,
        temperature_c: i32,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            resolved_city: resolved_city.into(),
            temperature_c,
            temperature_f: celsius_to_fahrenheit(temperature_c),
            summary: summary.into(),
        }
    }

    pub fn resolved_city(&self) -> &str {
        &self.resolved_city
    }

    pub fn temperature_c(&self) -> i32 {
        self.temperature_c
    }

    pub fn temperature_f(&self) -> i32 {
        self.temperature_f
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }
}

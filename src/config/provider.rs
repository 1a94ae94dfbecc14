//! Upstream weather provider configuration.

use std::{env, time::Duration};

/// Connection settings for the Visual Crossing timeline API
///
/// `base_url` and `api_key` have no defaults. When either is missing the
/// provider still constructs, but every lookup fails as misconfigured.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    /// e.g. `https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline`
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_seconds: 5,
            connect_timeout_seconds: 3,
        }
    }
}

impl ProviderConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = non_blank_var("WEATHER_PROVIDER_BASE_URL");
        let api_key = non_blank_var("WEATHER_PROVIDER_API_KEY");

        let timeout_seconds = env::var("WEATHER_PROVIDER_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.timeout_seconds);

        let connect_timeout_seconds = env::var("WEATHER_PROVIDER_CONNECT_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.connect_timeout_seconds);

        Self {
            base_url,
            api_key,
            timeout_seconds,
            connect_timeout_seconds,
        }
    }

    /// Both the endpoint and the credential are present
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.api_key.is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

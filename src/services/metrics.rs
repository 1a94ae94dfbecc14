//! Metrics collection and Prometheus integration service.

use crate::{errors::ProviderError, services::events::WeatherEvents};
use prometheus::{
    CounterVec, Gauge, Histogram, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::{Duration, Instant};

/// Git revision baked in at build time, when the build ran inside a checkout
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

pub const BUILD_TIMESTAMP: &str = match option_env!("VERGEN_BUILD_TIMESTAMP") {
    Some(timestamp) => timestamp,
    None => "unknown",
};

/// Application metrics collector for Prometheus integration
#[derive(Clone)]
pub struct AppMetrics {
    pub registry: Registry,
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub app_uptime_seconds: Gauge,
    pub app_info: CounterVec,
    pub weather_cache_lookups_total: CounterVec,
    pub weather_provider_requests_total: CounterVec,
    pub weather_provider_duration_seconds: Histogram,
    pub start_time: Instant,
}

impl AppMetrics {
    /// Create a new metrics collector with its own registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "status", "route"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route"],
        )?;

        let app_uptime_seconds = Gauge::new("app_uptime_seconds", "Application uptime in seconds")?;

        let app_info = CounterVec::new(
            Opts::new("app_info", "Application information"),
            &["version", "commit", "build_time"],
        )?;

        // outcome = hit | miss
        let weather_cache_lookups_total = CounterVec::new(
            Opts::new(
                "weather_cache_lookups_total",
                "Weather cache lookups by outcome",
            ),
            &["outcome"],
        )?;

        // outcome = success | ProviderError::kind()
        let weather_provider_requests_total = CounterVec::new(
            Opts::new(
                "weather_provider_requests_total",
                "Upstream weather provider calls by outcome",
            ),
            &["outcome"],
        )?;

        let weather_provider_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "weather_provider_duration_seconds",
                "Upstream weather provider call duration in seconds",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(app_uptime_seconds.clone()))?;
        registry.register(Box::new(app_info.clone()))?;
        registry.register(Box::new(weather_cache_lookups_total.clone()))?;
        registry.register(Box::new(weather_provider_requests_total.clone()))?;
        registry.register(Box::new(weather_provider_duration_seconds.clone()))?;

        app_info
            .with_label_values(&[env!("CARGO_PKG_VERSION"), GIT_SHA, BUILD_TIMESTAMP])
            .inc();

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            app_uptime_seconds,
            app_info,
            weather_cache_lookups_total,
            weather_provider_requests_total,
            weather_provider_duration_seconds,
            start_time: Instant::now(),
        })
    }

    /// Record an HTTP request with method, route, status, and duration
    pub fn record_request(&self, method: &str, route: &str, status: u16, duration: Duration) {
        if route == "/api/metrics" {
            // Scrapes would otherwise dominate the request counters
            return;
        }

        let status = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, status.as_str(), route])
            .inc();

        self.http_request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration.as_secs_f64());
    }

    /// Update the application uptime gauge
    pub fn update_uptime(&self) {
        let uptime = self.start_time.elapsed().as_secs_f64();
        self.app_uptime_seconds.set(uptime);
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}

impl WeatherEvents for AppMetrics {
    fn cache_hit(&self, _key: &str) {
        self.weather_cache_lookups_total
            .with_label_values(&["hit"])
            .inc();
    }

    fn cache_miss(&self, _key: &str) {
        self.weather_cache_lookups_total
            .with_label_values(&["miss"])
            .inc();
    }

    fn provider_succeeded(&self, _city: &str, elapsed: Duration) {
        self.weather_provider_requests_total
            .with_label_values(&["success"])
            .inc();
        self.weather_provider_duration_seconds
            .observe(elapsed.as_secs_f64());
    }

    fn provider_failed(&self, _city: &str, error: &ProviderError, elapsed: Duration) {
        self.weather_provider_requests_total
            .with_label_values(&[error.kind()])
            .inc();
        self.weather_provider_duration_seconds
            .observe(elapsed.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_events_are_counted() {
        let metrics = AppMetrics::new().unwrap();

        metrics.cache_miss("paris");
        metrics.provider_succeeded("Paris", Duration::from_millis(120));
        metrics.cache_hit("paris");
        metrics.cache_hit("paris");
        metrics.provider_failed("Atlantis", &ProviderError::NoData, Duration::from_millis(80));

        let lookups = &metrics.weather_cache_lookups_total;
        assert_eq!(lookups.with_label_values(&["hit"]).get(), 2.0);
        assert_eq!(lookups.with_label_values(&["miss"]).get(), 1.0);

        let calls = &metrics.weather_provider_requests_total;
        assert_eq!(calls.with_label_values(&["success"]).get(), 1.0);
        assert_eq!(calls.with_label_values(&["no_data"]).get(), 1.0);
        assert_eq!(metrics.weather_provider_duration_seconds.get_sample_count(), 2);
    }

    #[test]
    fn test_metrics_endpoint_is_not_recorded() {
        let metrics = AppMetrics::new().unwrap();
        metrics.record_request("GET", "/api/metrics", 200, Duration::from_millis(1));
        metrics.record_request("GET", "/weather/{city}", 200, Duration::from_millis(1));

        let rendered = metrics.render().unwrap();
        assert!(!rendered.contains("route=\"/api/metrics\""));
        assert!(rendered.contains("route=\"/weather/{city}\""));
    }
}

//! Metrics endpoint handler.

use crate::{config::MetricsConfig, services::AppMetrics};
use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;

/// Prometheus metrics endpoint
///
/// Returns 503 when metrics are disabled by configuration or no collector
/// is registered with the app.
#[api_v2_operation(
    summary = "Prometheus Metrics Endpoint",
    description = "Returns Prometheus-formatted metrics covering HTTP traffic, weather cache hit rates, and upstream provider calls.",
    tags("Metrics")
)]
pub async fn get_metrics(req: HttpRequest) -> Result<HttpResponse, Error> {
    if let Some(config) = req.app_data::<web::Data<MetricsConfig>>() {
        if !config.enabled {
            return Ok(HttpResponse::ServiceUnavailable()
                .content_type("text/plain")
                .body("Metrics collection is disabled"));
        }
    }

    let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() else {
        return Err(actix_web::error::ErrorServiceUnavailable(
            "Metrics not available",
        ));
    };

    metrics.update_uptime();
    match metrics.render() {
        Ok(metrics_output) => Ok(HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4; charset=utf-8")
            .body(metrics_output)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render metrics");
            Err(actix_web::error::ErrorInternalServerError(
                "Failed to render metrics",
            ))
        }
    }
}

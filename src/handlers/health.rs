//! Health check endpoint handler.

use crate::models::HealthResponse;
use actix_web::{Error, Result, web};
use paperclip::actix::api_v2_operation;

/// Health check endpoint
///
/// Reports liveness only; it never calls the upstream weather provider, so
/// a provider outage does not take instances out of rotation.
#[api_v2_operation(
    summary = "Health Check Endpoint",
    description = "Returns the current health status of the API in JSON format.",
    tags("Health")
)]
pub async fn health() -> Result<web::Json<HealthResponse>, Error> {
    Ok(web::Json(HealthResponse {
        status: "healthy".to_string(),
    }))
}

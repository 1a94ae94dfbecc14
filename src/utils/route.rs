//! Route pattern extraction utilities.

use actix_web::HttpRequest;

/// Route label for metrics and logs
///
/// Uses the matched resource pattern (`/weather/{city}`) rather than the
/// concrete path so every city shares one label. Unmatched paths collapse
/// into `/unknown`.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| "/unknown".to_string())
}

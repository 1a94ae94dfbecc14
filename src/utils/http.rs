//! HTTP utility functions for extracting request information.

use actix_web::HttpRequest;

/// Extract the client IP address for logging
///
/// Prefers the first hop of `X-Forwarded-For`, then `X-Real-IP`, and falls
/// back to the socket peer address. Proxy headers are client-controlled, so
/// this is for diagnostics only; rate limiting keys on the peer address.
pub fn extract_client_ip(req: &HttpRequest) -> String {
    for header_name in ["X-Forwarded-For", "X-Real-IP"] {
        let forwarded = req
            .headers()
            .get(header_name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());

        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}

/// Extract user agent from request headers
pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_forwarded_for_first_hop() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .to_http_request();
        assert_eq!(extract_client_ip(&req), "203.0.113.7");
    }

    #[test]
    fn test_falls_back_to_peer_address() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.10:4711".parse().unwrap())
            .to_http_request();
        assert_eq!(extract_client_ip(&req), "192.0.2.10");
    }

    #[test]
    fn test_user_agent() {
        let req = TestRequest::default()
            .insert_header(("User-Agent", "curl/8.5.0"))
            .to_http_request();
        assert_eq!(extract_user_agent(&req).as_deref(), Some("curl/8.5.0"));
        assert!(extract_user_agent(&TestRequest::default().to_http_request()).is_none());
    }
}

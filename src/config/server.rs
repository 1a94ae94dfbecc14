//! HTTP server bind configuration.

use std::env;

const LOCAL_BIND_ADDRESS: &str = "127.0.0.1:8080";
const CONTAINER_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Where the HTTP server listens
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: LOCAL_BIND_ADDRESS.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// `BIND_ADDRESS` wins; otherwise a container runtime (Kubernetes or a
    /// `DOCKER_CONTAINER` marker) binds on all interfaces, and local runs stay
    /// on loopback.
    pub fn from_env() -> Self {
        let bind_address = detect_bind_address(
            env::var("KUBERNETES_SERVICE_HOST").ok().as_deref(),
            env::var("DOCKER_CONTAINER").ok().as_deref(),
            env::var("BIND_ADDRESS").ok().as_deref(),
        );

        Self { bind_address }
    }
}

fn detect_bind_address(
    kubernetes_host: Option<&str>,
    docker_marker: Option<&str>,
    bind_override: Option<&str>,
) -> String {
    if let Some(bind) = bind_override.filter(|b| !b.trim().is_empty()) {
        return bind.trim().to_string();
    }

    if kubernetes_host.is_some() || docker_marker.is_some() {
        CONTAINER_BIND_ADDRESS.to_string()
    } else {
        LOCAL_BIND_ADDRESS.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address_detection() {
        assert_eq!(detect_bind_address(None, None, None), "127.0.0.1:8080");
        assert_eq!(
            detect_bind_address(Some("10.0.0.1"), None, None),
            "0.0.0.0:8080"
        );
        assert_eq!(detect_bind_address(None, Some("true"), None), "0.0.0.0:8080");
        assert_eq!(
            detect_bind_address(Some("10.0.0.1"), None, Some("0.0.0.0:9000")),
            "0.0.0.0:9000"
        );
        assert_eq!(detect_bind_address(None, None, Some("  ")), "127.0.0.1:8080");
    }
}

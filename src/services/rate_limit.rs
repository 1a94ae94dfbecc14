//! Rate limiting service for controlling request frequency.

use crate::{config::RateLimitConfig, models::ErrorResponse};
use actix_web::{HttpRequest, HttpResponse, http::header};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

/// Outcome of an admission check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    /// Rejected until the current window closes
    Limited { retry_after: Duration },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }
}

/// Simple in-memory rate limiter
///
/// Fixed-window counting per client key: each key gets `requests` permits
/// per window, and the counter resets once the window that started with the
/// key's first request has elapsed. Requests over the limit are rejected,
/// never queued.
#[derive(Clone)]
pub struct SimpleRateLimiter {
    config: RateLimitConfig,
    storage: Arc<Mutex<Windows>>,
}

/// Per-client counters plus the time closed windows were last dropped
struct Windows {
    clients: HashMap<String, (usize, Instant)>,
    last_pruned: Instant,
}

impl SimpleRateLimiter {
    /// Create a new rate limiter with the given configuration
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            storage: Arc::new(Mutex::new(Windows {
                clients: HashMap::new(),
                last_pruned: Instant::now(),
            })),
        }
    }

    /// Check whether `key` may make another request, counting it if so
    pub fn check(&self, key: &str) -> RateLimitDecision {
        let window = self.config.window();
        let now = Instant::now();
        let mut storage = self.storage.lock().unwrap_or_else(PoisonError::into_inner);

        // Forget closed windows at most once per window
        if now.duration_since(storage.last_pruned) >= window {
            storage
                .clients
                .retain(|_, (_, window_start)| now.duration_since(*window_start) < window);
            storage.last_pruned = now;
        }

        let (count, window_start) = storage.clients.entry(key.to_string()).or_insert((0, now));
        if now.duration_since(*window_start) >= window {
            *count = 0;
            *window_start = now;
        }

        if *count >= self.config.requests {
            let retry_after = window.saturating_sub(now.duration_since(*window_start));
            return RateLimitDecision::Limited { retry_after };
        }

        *count += 1;
        RateLimitDecision::Allowed
    }

    /// Returns `true` if the request should be allowed, `false` if rate limited.
    pub fn check_rate_limit(&self, key: &str) -> bool {
        self.check(key).is_allowed()
    }

    /// Number of clients currently holding a counter
    pub fn tracked_clients(&self) -> usize {
        self.storage
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clients
            .len()
    }
}

/// Apply the limiter to an incoming request
///
/// Clients are keyed by peer address. Returns the ready-made 429 response
/// when the client is over its allowance.
pub fn rate_limit_middleware(
    req: &HttpRequest,
    limiter: &SimpleRateLimiter,
) -> Result<(), HttpResponse> {
    let client = req
        .connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string();

    match limiter.check(&client) {
        RateLimitDecision::Allowed => Ok(()),
        RateLimitDecision::Limited { retry_after } => {
            tracing::warn!(
                client = %client,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            // Round up so clients never retry inside the closed window
            let seconds = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            Err(HttpResponse::TooManyRequests()
                .insert_header((header::RETRY_AFTER, seconds.to_string()))
                .json(ErrorResponse::new(
                    "TooManyRequests",
                    "Rate limit exceeded. Try again later.",
                )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn limiter(requests: usize, period_seconds: u64) -> SimpleRateLimiter {
        SimpleRateLimiter::new(RateLimitConfig {
            requests,
            period_seconds,
        })
    }

    #[test]
    fn test_limit_per_client() {
        let limiter = limiter(2, 60);

        assert!(limiter.check_rate_limit("10.0.0.1"));
        assert!(limiter.check_rate_limit("10.0.0.1"));
        assert!(!limiter.check_rate_limit("10.0.0.1"));

        // Other clients keep their own allowance
        assert!(limiter.check_rate_limit("10.0.0.2"));
    }

    #[test]
    fn test_retry_after_is_within_window() {
        let limiter = limiter(1, 60);
        assert!(limiter.check("client").is_allowed());

        match limiter.check("client") {
            RateLimitDecision::Limited { retry_after } => {
                assert!(retry_after <= Duration::from_secs(60));
                assert!(retry_after > Duration::from_secs(55));
            }
            RateLimitDecision::Allowed => panic!("second request should be limited"),
        }
    }

    #[test]
    fn test_window_resets() {
        let limiter = limiter(1, 1);

        assert!(limiter.check_rate_limit("client"));
        assert!(!limiter.check_rate_limit("client"));

        sleep(Duration::from_millis(1100));

        assert!(limiter.check_rate_limit("client"));
    }

    #[test]
    fn test_closed_windows_are_pruned_once_per_window() {
        let limiter = limiter(1, 1);

        assert!(limiter.check_rate_limit("10.0.0.1"));
        assert!(limiter.check_rate_limit("10.0.0.2"));
        assert_eq!(limiter.tracked_clients(), 2);

        sleep(Duration::from_millis(1100));

        assert!(limiter.check_rate_limit("10.0.0.3"));
        assert_eq!(limiter.tracked_clients(), 1, "closed windows should be dropped");
    }

    #[test]
    fn test_zero_allowance_rejects_everything() {
        let limiter = limiter(0, 60);
        assert!(!limiter.check_rate_limit("client"));
    }
}

//! Business logic and service layer modules.
//!
//! The weather lookup core lives here: the TTL cache, the upstream provider,
//! and the cache-aside [`WeatherService`] tying them together. Rate limiting
//! and metrics are the supporting services the HTTP layer wires in front.

pub mod cache;
pub mod events;
pub mod metrics;
pub mod provider;
pub mod rate_limit;
pub mod weather;

pub use cache::*;
pub use events::*;
pub use metrics::*;
pub use provider::*;
pub use rate_limit::*;
pub use weather::*;

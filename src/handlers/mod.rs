//! HTTP request handlers for API endpoints.
//!
//! Handlers stay thin: they pull shared services out of app data, call into
//! the service layer, and map outcomes onto HTTP responses.

pub mod health;
pub mod metrics;
pub mod openapi;
pub mod version;
pub mod weather;

pub use health::*;
pub use metrics::*;
pub use openapi::*;
pub use version::*;
pub use weather::*;

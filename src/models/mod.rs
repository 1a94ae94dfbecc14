//! Data models and schemas for the weather API.
//!
//! `weather` holds the domain values the service layer passes around;
//! `api` holds the JSON shapes of the auxiliary endpoints and error bodies.

pub mod api;
pub mod weather;

pub use api::*;
pub use weather::*;

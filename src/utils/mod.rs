//! Utility functions and helper modules.
//!
//! Request introspection helpers shared by the middleware layer.

pub mod http;
pub mod route;

pub use http::*;
pub use route::*;

//! HTTP middleware shared by every route.
//!
//! This module provides:
//! - Request logging with latency tracking
//! - The storefront CORS policy

pub mod cors;
pub mod logging;

pub use cors::cors_layer;
pub use logging::request_logging;

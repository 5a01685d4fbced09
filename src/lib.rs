//! DreamBuy Shop Backend Library
//!
//! Exposes the router, access gate and document store for the binary and tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod middleware;
pub mod store;

pub use api::{build_router, AppState};
pub use config::Config;

//! Authentication Module
//! Mission: Gate API access with JWT bearer tokens and role checks

pub mod api;
pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod models;

pub use gate::{AccessPipeline, Gate};
pub use jwt::JwtHandler;
pub use middleware::{access_gate, AuthError};
pub use models::Claims;

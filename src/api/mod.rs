//! Shop API
//! Mission: Thin HTTP pass-through over the document collections

pub mod catalog;
pub mod orders;
pub mod routes;
pub mod users;

pub use routes::build_router;

use crate::{auth::JwtHandler, store::DocumentStore};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AppState {
    pub fn new(store: Arc<DocumentStore>, jwt_handler: Arc<JwtHandler>) -> Self {
        Self { store, jwt_handler }
    }
}

/// Resource API errors
#[derive(Debug)]
pub enum ApiError {
    NotFound(&'static str),
    UpdateFailed,
    Internal,
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        error!("Store operation failed: {:#}", err);
        ApiError::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "message": message })),
            ApiError::UpdateFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to update user" }),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

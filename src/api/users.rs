//! User endpoints

use crate::{
    api::{ApiError, AppState},
    store::{Collection, InsertOneResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{Map, Value};
use tracing::{info, warn};

/// GET /user
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.store.find_all(Collection::User)?))
}

/// GET /user/:id - `null` when no such user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Value>>, ApiError> {
    Ok(Json(state.store.find_by_id(Collection::User, &id)?))
}

/// GET /user/email/:email
pub async fn get_users_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(
        state.store.find_by_field(Collection::User, "email", &email)?,
    ))
}

/// POST /user - self-registration, stored as submitted
pub async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<Map<String, Value>>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let result = state.store.insert(Collection::User, user)?;
    info!("✅ Registered user {}", result.inserted_id);
    Ok(Json(result))
}

/// PUT /user/:email - `$set` the body onto the user with that email
pub async fn update_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(changes): Json<Map<String, Value>>,
) -> Result<Json<Option<Value>>, ApiError> {
    let update_failed = |e: anyhow::Error| {
        warn!("Failed to update user {}: {:#}", email, e);
        ApiError::UpdateFailed
    };

    let result = state
        .store
        .update_one_by_field(Collection::User, "email", &email, changes)
        .map_err(update_failed)?;

    if result.modified_count == 0 {
        return Err(ApiError::NotFound("User not found or no change in data"));
    }

    let updated = state
        .store
        .find_one_by_field(Collection::User, "email", &email)
        .map_err(update_failed)?;

    Ok(Json(updated))
}

//! Product and banner endpoints (read-only)

use crate::{
    api::{ApiError, AppState},
    store::Collection,
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

/// GET /product
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.store.find_all(Collection::Product)?))
}

/// GET /product/:id - `null` when absent
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Value>>, ApiError> {
    Ok(Json(state.store.find_by_id(Collection::Product, &id)?))
}

/// GET /banner
pub async fn list_banners(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.store.find_all(Collection::Banner)?))
}

/// GET /banner/:id - `null` when absent
pub async fn get_banner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Value>>, ApiError> {
    Ok(Json(state.store.find_by_id(Collection::Banner, &id)?))
}

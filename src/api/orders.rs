//! Order endpoints

use crate::{
    api::{ApiError, AppState},
    store::{Collection, InsertOneResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{Map, Value};
use tracing::info;

/// GET /order
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.store.find_all(Collection::Order)?))
}

/// GET /order/:email - orders placed under that email
pub async fn get_orders_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(
        state.store.find_by_field(Collection::Order, "email", &email)?,
    ))
}

/// POST /order
pub async fn create_order(
    State(state): State<AppState>,
    Json(order): Json<Map<String, Value>>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let result = state.store.insert(Collection::Order, order)?;
    info!("🛒 Order placed: {}", result.inserted_id);
    Ok(Json(result))
}

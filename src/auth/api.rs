//! Authentication API Endpoints
//! Mission: Hand out tokens and answer "am I an admin?"

use crate::{
    api::{ApiError, AppState},
    auth::models::{AdminStatus, Claims, TokenResponse},
    store::CredentialStore,
};
use axum::{
    extract::State,
    Extension, Json,
};
use serde_json::{Map, Value};
use tracing::debug;

/// Token endpoint - POST /jwt
///
/// Signs whatever object the client posts. The identity is not checked
/// against the user collection.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.jwt_handler.issue(payload)?;
    Ok(Json(TokenResponse { token }))
}

/// Admin check - GET /user/admin/:email
///
/// Mounted behind RequireAuthenticated + RequireSelf("email"), so the path
/// email and the token's email are the same. The lookup uses the token's.
pub async fn check_admin(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<AdminStatus>, ApiError> {
    let Some(email) = claims.email() else {
        return Ok(Json(AdminStatus { admin: false }));
    };

    let admin = state
        .store
        .find_user_by_email(email)?
        .map(|user| user.is_admin())
        .unwrap_or(false);

    debug!("Admin check for {}: {}", email, admin);

    Ok(Json(AdminStatus { admin }))
}

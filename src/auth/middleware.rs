//! Authentication Middleware
//! Mission: Run the access gate in front of protected routes

use crate::auth::gate::AccessPipeline;
use axum::{
    extract::{RawPathParams, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, warn};

/// Middleware that runs an [`AccessPipeline`] and, on admission, stores the
/// verified claims in the request extensions.
///
/// Mount with `route_layer` so path parameters are already matched.
pub async fn access_gate(
    State(pipeline): State<AccessPipeline>,
    raw_params: RawPathParams,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let params: Vec<(&str, &str)> = raw_params.iter().collect();

    let claims = pipeline.run(req.headers(), &params).map_err(|e| {
        debug!(path = %req.uri().path(), reason = e.code(), "Request denied by access gate");
        e
    })?;

    if let Some(claims) = claims {
        req.extensions_mut().insert(claims);
    }

    Ok(next.run(req).await)
}

/// Auth error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header
    MissingCredentials,
    /// Bad scheme, bad signature, malformed or expired token
    InvalidOrExpiredToken,
    /// Role check failed
    Forbidden,
    /// Identity does not match the requested resource
    Unauthorized,
    /// Credential store could not be read
    StoreUnavailable,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::InvalidOrExpiredToken => "invalid_or_expired_token",
            AuthError::Forbidden => "forbidden",
            AuthError::Unauthorized => "unauthorized",
            AuthError::StoreUnavailable => "store_unavailable",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials | AuthError::InvalidOrExpiredToken => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Forbidden | AuthError::Unauthorized => StatusCode::FORBIDDEN,
            AuthError::StoreUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingCredentials
            | AuthError::InvalidOrExpiredToken
            | AuthError::Forbidden => "Forbidden access",
            AuthError::Unauthorized => "Unauthorized access",
            AuthError::StoreUnavailable => {
                warn!("Access gate failed on credential store read");
                "Internal server error"
            }
        };

        let body = json!({
            "error": self.code(),
            "message": message,
        });

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_responses() {
        let missing = AuthError::MissingCredentials.into_response();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let invalid = AuthError::InvalidOrExpiredToken.into_response();
        assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);

        let forbidden = AuthError::Forbidden.into_response();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let unauthorized = AuthError::Unauthorized.into_response();
        assert_eq!(unauthorized.status(), StatusCode::FORBIDDEN);

        let store = AuthError::StoreUnavailable.into_response();
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

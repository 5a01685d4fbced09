//! Access Gate
//! Mission: Compose authentication and authorization checks into one ordered pipeline
//!
//! Each step either admits (`Ok`) or denies (`Err(AuthError)`); the first
//! denial ends the request. Steps that need an identity read it from the
//! claims established by an earlier [`Gate::Authenticated`] step.

use crate::{
    auth::{jwt::JwtHandler, middleware::AuthError, models::Claims},
    store::CredentialStore,
};
use axum::http::{header::AUTHORIZATION, HeaderMap};
use std::sync::Arc;
use tracing::{debug, warn};

/// A single check in the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Valid bearer token present
    Authenticated,
    /// Authenticated identity has role "admin" in the credential store
    Admin,
    /// Authenticated email equals the named route parameter
    SelfParam(&'static str),
}

/// Ordered list of gates sharing the token handler and credential store
#[derive(Clone)]
pub struct AccessPipeline {
    gates: Vec<Gate>,
    jwt_handler: Arc<JwtHandler>,
    store: Arc<dyn CredentialStore>,
}

impl AccessPipeline {
    pub fn new(jwt_handler: Arc<JwtHandler>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            gates: Vec::new(),
            jwt_handler,
            store,
        }
    }

    pub fn require_authenticated(mut self) -> Self {
        self.gates.push(Gate::Authenticated);
        self
    }

    pub fn require_admin(mut self) -> Self {
        self.gates.push(Gate::Admin);
        self
    }

    pub fn require_self(mut self, param: &'static str) -> Self {
        self.gates.push(Gate::SelfParam(param));
        self
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Run every gate in order against one request.
    ///
    /// Returns the verified claims when the pipeline authenticated the caller.
    pub fn run(
        &self,
        headers: &HeaderMap,
        params: &[(&str, &str)],
    ) -> Result<Option<Claims>, AuthError> {
        let mut claims: Option<Claims> = None;

        for gate in &self.gates {
            match gate {
                Gate::Authenticated => {
                    claims = Some(require_authenticated(&self.jwt_handler, headers)?);
                }
                Gate::Admin => {
                    let claims = claims.as_ref().ok_or(AuthError::Forbidden)?;
                    require_admin(self.store.as_ref(), claims)?;
                }
                Gate::SelfParam(name) => {
                    let claims = claims.as_ref().ok_or(AuthError::Unauthorized)?;
                    let requested = params
                        .iter()
                        .find(|(key, _)| key == name)
                        .map(|(_, value)| *value)
                        .ok_or(AuthError::Unauthorized)?;
                    require_self(claims, requested)?;
                }
            }
        }

        Ok(claims)
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?;

    value
        .to_str()
        .ok()
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(AuthError::InvalidOrExpiredToken)
}

/// RequireAuthenticated: token present and valid.
pub fn require_authenticated(jwt_handler: &JwtHandler, headers: &HeaderMap) -> Result<Claims, AuthError> {
    let token = bearer_token(headers)?;
    jwt_handler.verify(token)
}

/// RequireAdmin: one credential store read, no caching.
pub fn require_admin(store: &dyn CredentialStore, claims: &Claims) -> Result<(), AuthError> {
    let email = claims.email().ok_or(AuthError::Forbidden)?;

    let user = store.find_user_by_email(email).map_err(|e| {
        warn!("Credential lookup failed for {}: {:#}", email, e);
        AuthError::StoreUnavailable
    })?;

    match user {
        Some(user) if user.is_admin() => Ok(()),
        Some(_) => {
            debug!("Admin check denied for {}: role is not admin", email);
            Err(AuthError::Forbidden)
        }
        None => {
            debug!("Admin check denied for {}: no user record", email);
            Err(AuthError::Forbidden)
        }
    }
}

/// RequireSelf: identity check only, never consults the store.
pub fn require_self(claims: &Claims, requested_email: &str) -> Result<(), AuthError> {
    match claims.email() {
        Some(email) if email == requested_email => Ok(()),
        _ => Err(AuthError::Unauthorized),
    }
}

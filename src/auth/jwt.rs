//! JWT Token Handler
//! Mission: Issue and verify signed, time-limited bearer tokens

use crate::auth::{
    middleware::AuthError,
    models::{Claims, RESERVED_CLAIMS},
};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use tracing::debug;

/// Default token lifetime: one hour
pub const DEFAULT_TTL_SECS: i64 = 3600;

/// Longest accepted token lifetime: ten years
pub const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 3600;

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key and the default one-hour lifetime
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, DEFAULT_TTL_SECS)
    }

    /// Lifetimes outside `1..=MAX_TTL_SECS` are clamped into that range.
    pub fn with_ttl(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact, and client payloads may carry an `aud` we never configured.
        validation.leeway = 0;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(ttl_secs.clamp(1, MAX_TTL_SECS)),
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Sign an arbitrary claims payload. No shape validation is performed.
    pub fn issue(&self, payload: Map<String, Value>) -> Result<String> {
        self.issue_at(payload, Utc::now())
    }

    /// Sign as if issued at `issued_at`. Expiry is `issued_at + ttl`.
    pub fn issue_at(&self, mut payload: Map<String, Value>, issued_at: DateTime<Utc>) -> Result<String> {
        for key in RESERVED_CLAIMS {
            payload.remove(key);
        }

        let expiration = issued_at
            .checked_add_signed(self.ttl)
            .context("Invalid timestamp")?;

        let claims = Claims {
            payload,
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        };

        debug!(
            "Issuing JWT for {}, expires in {}s",
            claims.email().unwrap_or("<no email>"),
            self.ttl.num_seconds()
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to generate JWT")
    }

    /// Verify signature and expiry and return the claims.
    /// Malformed, forged and expired tokens are indistinguishable to the caller.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!("Rejected JWT: {}", e);
            AuthError::InvalidOrExpiredToken
        })?;

        Ok(decoded.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    #[test]
    fn test_issue_and_verify_returns_payload_unchanged() {
        let handler = JwtHandler::new("test-secret-key-12345");
        let original = payload(json!({
            "email": "a@x.com",
            "displayName": "Ada",
            "photo": null,
            "tags": ["vip", 3],
            "nested": { "k": 1.5 }
        }));

        let token = handler.issue(original.clone()).unwrap();
        assert!(!token.is_empty());

        let claims = handler.verify(&token).unwrap();
        assert_eq!(claims.payload, original);
        assert_eq!(claims.email(), Some("a@x.com"));
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_empty_payload_is_accepted() {
        let handler = JwtHandler::new("test-secret-key-12345");
        let token = handler.issue(Map::new()).unwrap();
        let claims = handler.verify(&token).unwrap();
        assert!(claims.payload.is_empty());
        assert_eq!(claims.email(), None);
    }

    #[test]
    fn test_expired_token_rejected() {
        let handler = JwtHandler::new("test-secret-key-12345");
        let issued = Utc::now() - Duration::seconds(3601);

        let token = handler
            .issue_at(payload(json!({ "email": "a@x.com" })), issued)
            .unwrap();

        assert_eq!(
            handler.verify(&token).unwrap_err(),
            AuthError::InvalidOrExpiredToken
        );
    }

    #[test]
    fn test_token_within_lifetime_accepted() {
        let handler = JwtHandler::new("test-secret-key-12345");
        let issued = Utc::now() - Duration::minutes(59);

        let token = handler
            .issue_at(payload(json!({ "email": "a@x.com" })), issued)
            .unwrap();

        assert!(handler.verify(&token).is_ok());
    }

    #[test]
    fn test_custom_ttl() {
        let handler = JwtHandler::with_ttl("test-secret-key-12345", 60);
        assert_eq!(handler.ttl_secs(), 60);

        let issued = Utc::now() - Duration::seconds(120);
        let token = handler.issue_at(Map::new(), issued).unwrap();
        assert!(handler.verify(&token).is_err());
    }

    #[test]
    fn test_oversized_ttl_is_clamped() {
        let handler = JwtHandler::with_ttl("test-secret-key-12345", i64::MAX);
        assert_eq!(handler.ttl_secs(), MAX_TTL_SECS);

        let token = handler.issue(payload(json!({ "email": "a@x.com" }))).unwrap();
        let claims = handler.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, MAX_TTL_SECS);

        let huge = JwtHandler::with_ttl("test-secret-key-12345", 1_000_000_000_000_000);
        assert!(huge.issue(Map::new()).is_ok());

        assert_eq!(JwtHandler::with_ttl("test-secret-key-12345", -5).ttl_secs(), 1);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let handler = JwtHandler::new("test-secret-key-12345");

        for token in ["", "invalid.token.here", "not-a-jwt"] {
            assert_eq!(
                handler.verify(token).unwrap_err(),
                AuthError::InvalidOrExpiredToken
            );
        }
    }

    #[test]
    fn test_different_secrets_reject() {
        let handler1 = JwtHandler::new("secret1");
        let handler2 = JwtHandler::new("secret2");

        let token = handler1
            .issue(payload(json!({ "email": "a@x.com" })))
            .unwrap();

        assert_eq!(
            handler2.verify(&token).unwrap_err(),
            AuthError::InvalidOrExpiredToken
        );
    }

    #[test]
    fn test_client_cannot_extend_expiry() {
        let handler = JwtHandler::new("test-secret-key-12345");
        let issued = Utc::now() - Duration::hours(2);
        let far_future = Utc::now().timestamp() + 10 * 365 * 24 * 3600;

        let token = handler
            .issue_at(
                payload(json!({ "email": "a@x.com", "exp": far_future, "iat": 0 })),
                issued,
            )
            .unwrap();

        assert!(handler.verify(&token).is_err());
    }

    #[test]
    fn test_foreign_audience_claim_does_not_break_verification() {
        let handler = JwtHandler::new("test-secret-key-12345");
        let original = payload(json!({ "email": "a@x.com", "aud": "storefront" }));

        let token = handler.issue(original.clone()).unwrap();
        assert_eq!(handler.verify(&token).unwrap().payload, original);
    }
}

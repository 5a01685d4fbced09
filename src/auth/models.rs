//! Authentication Models
//! Mission: Define the token claims and the user identity view used by the access gate

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claim keys owned by the token handler. Client payloads never set these.
pub const RESERVED_CLAIMS: [&str; 2] = ["iat", "exp"];

/// JWT Claims payload
///
/// `payload` is whatever object the client submitted to `POST /jwt`, kept
/// verbatim. `iat`/`exp` are added at issuance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    pub iat: i64, // issued-at timestamp
    pub exp: i64, // expiration timestamp
}

impl Claims {
    /// Identity asserted by the token, if the payload carries a string `email`.
    pub fn email(&self) -> Option<&str> {
        self.payload.get("email").and_then(Value::as_str)
    }
}

/// User roles as stored on user documents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "user")]
    User,
}

impl UserRole {
    /// Exact match only: `"Admin"` is not an admin.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "user" => Some(UserRole::User),
            _ => None,
        }
    }
}

/// The slice of a user document the credential store hands to the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub email: String,
    pub role: Option<String>, // raw value, may be anything a client wrote
}

impl UserRecord {
    /// Build from a stored user document. Returns `None` when the document
    /// has no string `email`.
    pub fn from_document(doc: &Value) -> Option<Self> {
        let email = doc.get("email")?.as_str()?.to_string();
        let role = doc
            .get("role")
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(Self { email, role })
    }

    pub fn role(&self) -> Option<UserRole> {
        self.role.as_deref().and_then(UserRole::from_str)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(UserRole::Admin)
    }
}

/// Token response - POST /jwt
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Admin status response - GET /user/admin/:email
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminStatus {
    pub admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_claims_flatten_payload() {
        let claims: Claims = serde_json::from_value(json!({
            "email": "a@x.com",
            "name": "Ada",
            "iat": 100,
            "exp": 3700
        }))
        .unwrap();

        assert_eq!(claims.email(), Some("a@x.com"));
        assert_eq!(claims.iat, 100);
        assert_eq!(claims.exp, 3700);
        assert_eq!(claims.payload.len(), 2);
        assert!(!claims.payload.contains_key("exp"));
    }

    #[test]
    fn test_claims_email_must_be_string() {
        let claims: Claims =
            serde_json::from_value(json!({ "email": 42, "iat": 0, "exp": 1 })).unwrap();
        assert_eq!(claims.email(), None);
    }

    #[test]
    fn test_user_role_string_conversion() {
        assert_eq!(UserRole::from_str("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_str("user"), Some(UserRole::User));
        assert_eq!(UserRole::from_str("ADMIN"), None);
        assert_eq!(UserRole::from_str("owner"), None);
    }

    #[test]
    fn test_user_record_from_document() {
        let record = UserRecord::from_document(&json!({
            "_id": "abc",
            "email": "root@x.com",
            "role": "admin",
            "address": "Dhaka"
        }))
        .unwrap();
        assert_eq!(record.email, "root@x.com");
        assert!(record.is_admin());

        let plain = UserRecord::from_document(&json!({ "_id": "def", "email": "u@x.com" })).unwrap();
        assert_eq!(plain.role, None);
        assert!(!plain.is_admin());

        let odd_role =
            UserRecord::from_document(&json!({ "_id": "g", "email": "o@x.com", "role": true }))
                .unwrap();
        assert!(!odd_role.is_admin());

        let numeric_id = UserRecord::from_document(&json!({ "_id": 9, "email": "n@x.com" })).unwrap();
        assert_eq!(numeric_id.email, "n@x.com");

        assert!(UserRecord::from_document(&json!({ "_id": "h" })).is_none());
        assert!(UserRecord::from_document(&json!({ "email": 42 })).is_none());
    }
}

//! # AdminKit Auth
//!
//! JWT issuing/validation for the admin panel, bcrypt password handling,
//! and the permission predicate used by route guards.

use adminkit_core::error::{AdminError, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Role code that passes every permission check.
pub const SUPER_ADMIN_ROLE: &str = "super_admin";

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    pub exp: usize,
}

/// Generate a signed token for an authenticated user.
pub fn create_token(
    user_id: &str,
    username: &str,
    roles: Vec<String>,
    permissions: Vec<String>,
    tenant_id: Option<String>,
    secret: &str,
    ttl_hours: i64,
) -> Result<String> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(ttl_hours))
        .ok_or_else(|| AdminError::Auth("token expiry out of range".into()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id.into(),
        username: username.into(),
        roles,
        permissions,
        tenant_id,
        exp: expiration,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AdminError::Auth(format!("token creation failed: {e}")))
}

/// Validate and decode a token.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| AdminError::Auth(format!("token validation failed: {e}")))
}

/// Hash a password using bcrypt.
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, 12).map_err(|e| AdminError::Auth(format!("hash error: {e}")))
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Does a user with these roles/permissions satisfy `required`?
/// Super admins hold every permission.
pub fn has_permission(roles: &[String], permissions: &[String], required: &str) -> bool {
    roles.iter().any(|r| r == SUPER_ADMIN_ROLE) || permissions.iter().any(|p| p == required)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let secret = "test-secret-key-adminkit";
        let token = create_token(
            "user-1",
            "admin",
            vec!["super_admin".into()],
            vec!["system:user:query".into()],
            Some("tenant-1".into()),
            secret,
            24,
        )
        .unwrap();
        let claims = validate_token(&token, secret).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.roles, vec!["super_admin"]);
        assert_eq!(claims.tenant_id.as_deref(), Some("tenant-1"));
    }

    #[test]
    fn test_invalid_token() {
        assert!(validate_token("invalid.token.here", "secret").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token("u", "u", vec![], vec![], None, "secret-a", 1).unwrap();
        assert!(validate_token(&token, "secret-b").is_err());
    }

    #[test]
    fn test_password_hash() {
        let hash = hash_password("MySecurePassword123!").unwrap();
        assert!(verify_password("MySecurePassword123!", &hash));
        assert!(!verify_password("WrongPassword", &hash));
    }

    #[test]
    fn test_has_permission() {
        let perms = vec!["system:user:query".into()];
        assert!(has_permission(&[], &perms, "system:user:query"));
        assert!(!has_permission(&[], &perms, "system:user:delete"));
    }

    #[test]
    fn test_super_admin_bypasses_checks() {
        let roles = vec![SUPER_ADMIN_ROLE.to_string()];
        assert!(has_permission(&roles, &[], "system:anything:delete"));
    }
}

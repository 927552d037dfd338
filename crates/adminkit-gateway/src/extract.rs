//! Request extraction and error mapping.
//!
//! [`AuthUser`] pulls the Bearer token out of the request and validates it
//! against the configured secret; handlers declare their required permission
//! by calling [`AuthUser::require`] before touching the database. Public
//! routes simply don't take the extractor.

use crate::server::AppState;
use adminkit_core::error::AdminError;
use adminkit_core::result::{ApiResult, error_code};
use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, StatusCode, header, request::Parts};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// Handler result: success envelope or an error envelope.
pub type ApiResponse<T> = Result<Json<ApiResult<T>>, ApiError>;

/// Wrap a payload in the success envelope.
pub fn ok<T>(data: T) -> ApiResponse<T> {
    Ok(Json(ApiResult::ok(data)))
}

/// An error response carrying both an HTTP status and a business code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i64,
    pub message: String,
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: error_code::UNAUTHORIZED,
            message: "Unauthorized".into(),
        }
    }

    pub fn forbidden(permission: &str) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            code: error_code::FORBIDDEN,
            message: format!("missing permission: {permission}"),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: error_code::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Domain failure delivered inside a 200 envelope, the way the result
    /// contract defines login errors (codes 1001..1003).
    pub fn business(code: i64, message: impl Into<String>) -> Self {
        Self { status: StatusCode::OK, code, message: message.into() }
    }
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        let (status, code) = match &err {
            AdminError::NotFound(_) => (StatusCode::NOT_FOUND, error_code::NOT_FOUND),
            AdminError::Invalid(_) => (StatusCode::BAD_REQUEST, error_code::BAD_REQUEST),
            AdminError::Conflict(_) => (StatusCode::CONFLICT, error_code::BAD_REQUEST),
            AdminError::Auth(_) => (StatusCode::UNAUTHORIZED, error_code::UNAUTHORIZED),
            AdminError::Database(_) | AdminError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_code::INTERNAL_ERROR)
            }
        };
        Self { status, code, message: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResult::<()>::err(self.code, self.message))).into_response()
    }
}

/// The authenticated caller, decoded from the Bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub tenant_id: Option<String>,
}

impl AuthUser {
    pub fn from_claims(claims: adminkit_auth::Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            roles: claims.roles,
            permissions: claims.permissions,
            tenant_id: claims.tenant_id,
        }
    }

    /// Guard: pass iff the caller holds `permission` (super admins always
    /// pass). The permission string names the failed check in the 403.
    pub fn require(&self, permission: &str) -> Result<(), ApiError> {
        if adminkit_auth::has_permission(&self.roles, &self.permissions, permission) {
            Ok(())
        } else {
            Err(ApiError::forbidden(permission))
        }
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(ApiError::unauthorized)?;
        let claims = adminkit_auth::validate_token(token, &state.config.auth.secret)
            .map_err(|_| ApiError::unauthorized())?;
        Ok(Self::from_claims(claims))
    }
}

/// Token from an `Authorization: Bearer …` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Best-effort client address from proxy headers.
pub(crate) fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(roles: &[&str], permissions: &[&str]) -> AuthUser {
        AuthUser {
            id: "u-1".into(),
            username: "tester".into(),
            roles: roles.iter().map(|s| s.to_string()).collect(),
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
            tenant_id: None,
        }
    }

    #[test]
    fn test_require_permission() {
        let u = user(&[], &["system:user:query"]);
        assert!(u.require("system:user:query").is_ok());
        let err = u.require("system:user:delete").unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert!(err.message.contains("system:user:delete"));
    }

    #[test]
    fn test_super_admin_passes_everything() {
        let u = user(&["super_admin"], &[]);
        assert!(u.require("system:tenant:delete").is_ok());
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, "Basic xyz".parse().unwrap());
        assert!(bearer_token(&headers).is_none());
    }

    #[test]
    fn test_client_ip_takes_first_hop() {
        let mut headers = HeaderMap::new();
        assert!(client_ip(&headers).is_none());
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_error_mapping() {
        let err: ApiError = AdminError::NotFound("user x".into()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, error_code::NOT_FOUND);

        let err: ApiError = AdminError::Database("boom".into()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}

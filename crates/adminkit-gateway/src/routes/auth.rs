//! Login and profile.

use crate::extract::{ApiError, ApiResponse, AuthUser, client_ip, ok};
use crate::server::AppState;
use adminkit_core::result::error_code;
use adminkit_system::logs::login_result;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResp {
    pub access_token: String,
    pub username: String,
    pub nickname: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

/// Authenticate and issue a token. Both outcomes land in the login log;
/// failures are reported as business codes inside the envelope.
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<LoginReq>,
) -> ApiResponse<LoginResp> {
    let ip = client_ip(&headers);
    let agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let Some((account, password_hash)) = state.db.find_user_by_username(&req.username)? else {
        state
            .db
            .record_login(&req.username, login_result::BAD_CREDENTIALS, ip.as_deref(), agent.as_deref())
            .ok();
        return Err(ApiError::business(error_code::USER_NOT_EXISTS, "user does not exist"));
    };

    if !adminkit_auth::verify_password(&req.password, &password_hash) {
        state
            .db
            .record_login(&req.username, login_result::BAD_CREDENTIALS, ip.as_deref(), agent.as_deref())
            .ok();
        return Err(ApiError::business(error_code::USER_PASSWORD_FAILED, "password is incorrect"));
    }

    if account.status != 0 {
        state
            .db
            .record_login(&req.username, login_result::USER_DISABLED, ip.as_deref(), agent.as_deref())
            .ok();
        return Err(ApiError::business(error_code::USER_DISABLED, "user is disabled"));
    }

    let roles = state.db.user_role_codes(&account.id)?;
    let permissions = state.db.user_permissions(&account.id)?;
    let access_token = adminkit_auth::create_token(
        &account.id,
        &account.username,
        roles.clone(),
        permissions.clone(),
        account.tenant_id.clone(),
        &state.config.auth.secret,
        state.config.auth.token_ttl_hours,
    )?;

    state
        .db
        .record_login(&account.username, login_result::SUCCESS, ip.as_deref(), agent.as_deref())
        .ok();
    state
        .db
        .update_login_info(&account.id, ip.as_deref().unwrap_or("unknown"))
        .ok();

    ok(LoginResp {
        access_token,
        username: account.username,
        nickname: account.nickname,
        roles,
        permissions,
    })
}

/// The caller's account plus effective roles and permissions.
pub async fn profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResponse<serde_json::Value> {
    let account = state.db.get_user(&user.id)?;
    ok(serde_json::json!({
        "user": account,
        "roles": user.roles,
        "permissions": user.permissions,
    }))
}

//! User management.

use super::PageQuery;
use crate::extract::{ApiError, ApiResponse, AuthUser, ok};
use crate::server::AppState;
use adminkit_core::result::PageResult;
use adminkit_system::users::{User, UserData};
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CreateUserReq {
    #[serde(flatten)]
    pub user: UserData,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordReq {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignRolesReq {
    pub role_ids: Vec<String>,
}

pub async fn page(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResponse<PageResult<User>> {
    user.require("system:user:query")?;
    let (list, total) = state.db.page_users(query.page, query.page_size, query.keyword.as_deref())?;
    ok(PageResult::new(list, total, query.page, query.page_size))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<User> {
    user.require("system:user:query")?;
    ok(state.db.get_user(&id)?)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateUserReq>,
) -> ApiResponse<User> {
    user.require("system:user:create")?;
    if req.password.is_empty() {
        return Err(ApiError::bad_request("password is required"));
    }
    let hash = adminkit_auth::hash_password(&req.password)?;
    ok(state.db.create_user(&req.user, &hash)?)
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(data): Json<UserData>,
) -> ApiResponse<User> {
    user.require("system:user:update")?;
    ok(state.db.update_user(&id, &data)?)
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    user.require("system:user:delete")?;
    state.db.delete_user(&id)?;
    ok(())
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<ResetPasswordReq>,
) -> ApiResponse<()> {
    user.require("system:user:update")?;
    if req.password.is_empty() {
        return Err(ApiError::bad_request("password is required"));
    }
    let hash = adminkit_auth::hash_password(&req.password)?;
    state.db.reset_user_password(&id, &hash)?;
    ok(())
}

pub async fn role_ids(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<Vec<String>> {
    user.require("system:user:query")?;
    ok(state.db.user_role_ids(&id)?)
}

pub async fn assign_roles(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<AssignRolesReq>,
) -> ApiResponse<()> {
    user.require("system:user:update")?;
    state.db.get_user(&id)?;
    state.db.assign_user_roles(&id, &req.role_ids)?;
    ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::{admin_user, limited_user, test_state};

    fn sample(username: &str) -> CreateUserReq {
        CreateUserReq {
            user: UserData {
                username: username.into(),
                nickname: format!("{username} nick"),
                ..Default::default()
            },
            password: "initial-pw".into(),
        }
    }

    #[tokio::test]
    async fn test_create_then_page() {
        let state = test_state();
        let created = create(State(state.clone()), admin_user(), Json(sample("alice")))
            .await
            .unwrap();
        assert_eq!(created.0.data.as_ref().unwrap().username, "alice");

        let resp = page(State(state), admin_user(), Query(PageQuery::default())).await.unwrap();
        let page = resp.0.data.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_permission_guard_blocks_create() {
        let state = test_state();
        let err = create(
            State(state),
            limited_user(&["system:user:query"]),
            Json(sample("bob")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_empty_password_rejected() {
        let state = test_state();
        let mut req = sample("carol");
        req.password.clear();
        let err = create(State(state), admin_user(), Json(req)).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_assign_roles_roundtrip() {
        let state = test_state();
        let created = create(State(state.clone()), admin_user(), Json(sample("dave")))
            .await
            .unwrap();
        let user_id = created.0.data.unwrap().id;
        let role = state.db.find_role_by_code("super_admin").unwrap().unwrap();

        assign_roles(
            State(state.clone()),
            admin_user(),
            Path(user_id.clone()),
            Json(AssignRolesReq { role_ids: vec![role.id.clone()] }),
        )
        .await
        .unwrap();

        let resp = role_ids(State(state), admin_user(), Path(user_id)).await.unwrap();
        assert_eq!(resp.0.data.unwrap(), vec![role.id]);
    }

    #[tokio::test]
    async fn test_get_missing_user_is_404() {
        let state = test_state();
        let err = get(State(state), admin_user(), Path("ghost".into())).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }
}

//! Role management.

use super::PageQuery;
use crate::extract::{ApiResponse, AuthUser, ok};
use crate::server::AppState;
use adminkit_core::result::PageResult;
use adminkit_system::roles::{Role, RoleData};
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct AssignMenusReq {
    pub menu_ids: Vec<String>,
}

pub async fn page(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResponse<PageResult<Role>> {
    user.require("system:role:query")?;
    let (list, total) = state.db.page_roles(query.page, query.page_size)?;
    ok(PageResult::new(list, total, query.page, query.page_size))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<Role> {
    user.require("system:role:query")?;
    ok(state.db.get_role(&id)?)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(data): Json<RoleData>,
) -> ApiResponse<Role> {
    user.require("system:role:create")?;
    ok(state.db.create_role(&data)?)
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(data): Json<RoleData>,
) -> ApiResponse<Role> {
    user.require("system:role:update")?;
    ok(state.db.update_role(&id, &data)?)
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    user.require("system:role:delete")?;
    state.db.delete_role(&id)?;
    ok(())
}

pub async fn menu_ids(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<Vec<String>> {
    user.require("system:role:query")?;
    ok(state.db.role_menu_ids(&id)?)
}

pub async fn assign_menus(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<AssignMenusReq>,
) -> ApiResponse<()> {
    user.require("system:role:update")?;
    state.db.get_role(&id)?;
    state.db.assign_role_menus(&id, &req.menu_ids)?;
    ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::{admin_user, limited_user, test_state};

    #[tokio::test]
    async fn test_role_crud_via_handlers() {
        let state = test_state();
        let created = create(
            State(state.clone()),
            admin_user(),
            Json(RoleData { name: "Ops".into(), code: "ops".into(), ..Default::default() }),
        )
        .await
        .unwrap();
        let role = created.0.data.unwrap();

        let fetched = get(State(state.clone()), admin_user(), Path(role.id.clone())).await.unwrap();
        assert_eq!(fetched.0.data.unwrap().code, "ops");

        remove(State(state.clone()), admin_user(), Path(role.id.clone())).await.unwrap();
        assert!(get(State(state), admin_user(), Path(role.id)).await.is_err());
    }

    #[tokio::test]
    async fn test_assign_menus_requires_update_permission() {
        let state = test_state();
        let err = assign_menus(
            State(state),
            limited_user(&["system:role:query"]),
            Path("r-1".into()),
            Json(AssignMenusReq { menu_ids: vec![] }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }
}

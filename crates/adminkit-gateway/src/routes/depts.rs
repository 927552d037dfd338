//! Department management.

use super::PageQuery;
use crate::extract::{ApiResponse, AuthUser, ok};
use crate::server::AppState;
use adminkit_core::result::PageResult;
use adminkit_system::depts::{Dept, DeptData, DeptTree, build_dept_tree};
use adminkit_system::menus::ROOT_PARENT;
use axum::Json;
use axum::extract::{Path, Query, State};
use std::sync::Arc;

pub async fn page(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResponse<PageResult<Dept>> {
    user.require("system:dept:query")?;
    let (list, total) = state.db.page_depts(query.page, query.page_size)?;
    ok(PageResult::new(list, total, query.page, query.page_size))
}

pub async fn tree(State(state): State<Arc<AppState>>, user: AuthUser) -> ApiResponse<Vec<DeptTree>> {
    user.require("system:dept:query")?;
    let depts = state.db.list_depts()?;
    ok(build_dept_tree(&depts, ROOT_PARENT))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<Dept> {
    user.require("system:dept:query")?;
    ok(state.db.get_dept(&id)?)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(data): Json<DeptData>,
) -> ApiResponse<Dept> {
    user.require("system:dept:create")?;
    ok(state.db.create_dept(&data)?)
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(data): Json<DeptData>,
) -> ApiResponse<Dept> {
    user.require("system:dept:update")?;
    ok(state.db.update_dept(&id, &data)?)
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    user.require("system:dept:delete")?;
    state.db.delete_dept(&id)?;
    ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::{admin_user, test_state};

    #[tokio::test]
    async fn test_seeded_root_dept_in_tree() {
        let state = test_state();
        let resp = tree(State(state), admin_user()).await.unwrap();
        let roots = resp.0.data.unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].dept.name, "Headquarters");
    }
}

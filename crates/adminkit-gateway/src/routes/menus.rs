//! Menu management.

use super::PageQuery;
use crate::extract::{ApiResponse, AuthUser, ok};
use crate::server::AppState;
use adminkit_core::result::PageResult;
use adminkit_system::menus::{Menu, MenuData, MenuTree, ROOT_PARENT, build_menu_tree};
use axum::Json;
use axum::extract::{Path, Query, State};
use std::sync::Arc;

pub async fn page(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResponse<PageResult<Menu>> {
    user.require("system:menu:query")?;
    let (list, total) = state.db.page_menus(query.page, query.page_size)?;
    ok(PageResult::new(list, total, query.page, query.page_size))
}

pub async fn tree(State(state): State<Arc<AppState>>, user: AuthUser) -> ApiResponse<Vec<MenuTree>> {
    user.require("system:menu:query")?;
    let menus = state.db.list_menus()?;
    ok(build_menu_tree(&menus, ROOT_PARENT))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<Menu> {
    user.require("system:menu:query")?;
    ok(state.db.get_menu(&id)?)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(data): Json<MenuData>,
) -> ApiResponse<Menu> {
    user.require("system:menu:create")?;
    ok(state.db.create_menu(&data)?)
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(data): Json<MenuData>,
) -> ApiResponse<Menu> {
    user.require("system:menu:update")?;
    ok(state.db.update_menu(&id, &data)?)
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    user.require("system:menu:delete")?;
    state.db.delete_menu(&id)?;
    ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::{admin_user, test_state};

    #[tokio::test]
    async fn test_tree_contains_seeded_catalog() {
        let state = test_state();
        let resp = tree(State(state), admin_user()).await.unwrap();
        let roots = resp.0.data.unwrap();
        assert!(roots.iter().any(|t| t.menu.name == "System Management"));
        let system = roots.iter().find(|t| t.menu.name == "System Management").unwrap();
        assert!(!system.children.is_empty());
    }

    #[tokio::test]
    async fn test_create_menu_under_parent() {
        let state = test_state();
        let created = create(
            State(state.clone()),
            admin_user(),
            Json(MenuData { name: "Reports".into(), ..Default::default() }),
        )
        .await
        .unwrap();
        let id = created.0.data.unwrap().id;
        let fetched = get(State(state), admin_user(), Path(id)).await.unwrap();
        assert_eq!(fetched.0.data.unwrap().name, "Reports");
    }
}

//! Config parameter management.

use super::PageQuery;
use crate::extract::{ApiResponse, AuthUser, ok};
use crate::server::AppState;
use adminkit_core::result::PageResult;
use adminkit_system::configs::{ConfigItem, ConfigItemData};
use axum::Json;
use axum::extract::{Path, Query, State};
use std::sync::Arc;

pub async fn page(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResponse<PageResult<ConfigItem>> {
    user.require("system:config:query")?;
    let (list, total) = state.db.page_configs(query.page, query.page_size)?;
    ok(PageResult::new(list, total, query.page, query.page_size))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<ConfigItem> {
    user.require("system:config:query")?;
    ok(state.db.get_config(&id)?)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(data): Json<ConfigItemData>,
) -> ApiResponse<ConfigItem> {
    user.require("system:config:create")?;
    ok(state.db.create_config(&data)?)
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(data): Json<ConfigItemData>,
) -> ApiResponse<ConfigItem> {
    user.require("system:config:update")?;
    ok(state.db.update_config(&id, &data)?)
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    user.require("system:config:delete")?;
    state.db.delete_config(&id)?;
    ok(())
}

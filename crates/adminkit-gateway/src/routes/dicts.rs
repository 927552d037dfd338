//! Dictionary management. Mounted by the `dict` feature module.

use super::PageQuery;
use crate::extract::{ApiResponse, AuthUser, ok};
use crate::server::AppState;
use adminkit_core::result::PageResult;
use adminkit_system::dicts::{DictData, DictDataData, DictType, DictTypeData};
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct DictDataQuery {
    #[serde(rename = "type")]
    pub dict_type: String,
}

pub async fn page_types(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResponse<PageResult<DictType>> {
    user.require("system:dict:query")?;
    let (list, total) = state.db.page_dict_types(query.page, query.page_size)?;
    ok(PageResult::new(list, total, query.page, query.page_size))
}

pub async fn get_type(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<DictType> {
    user.require("system:dict:query")?;
    ok(state.db.get_dict_type(&id)?)
}

pub async fn create_type(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(data): Json<DictTypeData>,
) -> ApiResponse<DictType> {
    user.require("system:dict:create")?;
    ok(state.db.create_dict_type(&data)?)
}

pub async fn update_type(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(data): Json<DictTypeData>,
) -> ApiResponse<DictType> {
    user.require("system:dict:update")?;
    ok(state.db.update_dict_type(&id, &data)?)
}

pub async fn remove_type(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    user.require("system:dict:delete")?;
    state.db.delete_dict_type(&id)?;
    ok(())
}

/// Entries of one dictionary, sort-ordered.
pub async fn list_data(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<DictDataQuery>,
) -> ApiResponse<Vec<DictData>> {
    user.require("system:dict:query")?;
    ok(state.db.list_dict_data(&query.dict_type)?)
}

pub async fn create_data(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(data): Json<DictDataData>,
) -> ApiResponse<DictData> {
    user.require("system:dict:create")?;
    ok(state.db.create_dict_data(&data)?)
}

pub async fn update_data(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(data): Json<DictDataData>,
) -> ApiResponse<DictData> {
    user.require("system:dict:update")?;
    ok(state.db.update_dict_data(&id, &data)?)
}

pub async fn remove_data(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    user.require("system:dict:delete")?;
    state.db.delete_dict_data(&id)?;
    ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::{admin_user, test_state};

    #[tokio::test]
    async fn test_dict_type_and_data_flow() {
        let state = test_state();
        create_type(
            State(state.clone()),
            admin_user(),
            Json(DictTypeData {
                name: "User status".into(),
                dict_type: "sys_user_status".into(),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        create_data(
            State(state.clone()),
            admin_user(),
            Json(DictDataData {
                label: "Normal".into(),
                value: "0".into(),
                dict_type: "sys_user_status".into(),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let listed = list_data(
            State(state),
            admin_user(),
            Query(DictDataQuery { dict_type: "sys_user_status".into() }),
        )
        .await
        .unwrap();
        assert_eq!(listed.0.data.unwrap().len(), 1);
    }
}

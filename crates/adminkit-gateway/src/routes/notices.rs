//! Notice management. Mounted by the `notice` feature module.

use super::PageQuery;
use crate::extract::{ApiResponse, AuthUser, ok};
use crate::server::AppState;
use adminkit_core::result::PageResult;
use adminkit_system::notices::{Notice, NoticeData};
use axum::Json;
use axum::extract::{Path, Query, State};
use std::sync::Arc;

pub async fn page(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResponse<PageResult<Notice>> {
    user.require("system:notice:query")?;
    let (list, total) = state.db.page_notices(query.page, query.page_size)?;
    ok(PageResult::new(list, total, query.page, query.page_size))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<Notice> {
    user.require("system:notice:query")?;
    ok(state.db.get_notice(&id)?)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(data): Json<NoticeData>,
) -> ApiResponse<Notice> {
    user.require("system:notice:create")?;
    ok(state.db.create_notice(&data)?)
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(data): Json<NoticeData>,
) -> ApiResponse<Notice> {
    user.require("system:notice:update")?;
    ok(state.db.update_notice(&id, &data)?)
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    user.require("system:notice:delete")?;
    state.db.delete_notice(&id)?;
    ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::{admin_user, test_state};

    #[tokio::test]
    async fn test_notice_create_and_page() {
        let state = test_state();
        create(
            State(state.clone()),
            admin_user(),
            Json(NoticeData {
                title: "Release 1.1".into(),
                content: "Shipping Friday".into(),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let listed = page(State(state), admin_user(), Query(PageQuery::default())).await.unwrap();
        let page = listed.0.data.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.list[0].title, "Release 1.1");
    }
}

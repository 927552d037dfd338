//! Post management.

use super::PageQuery;
use crate::extract::{ApiResponse, AuthUser, ok};
use crate::server::AppState;
use adminkit_core::result::PageResult;
use adminkit_system::posts::{Post, PostData};
use axum::Json;
use axum::extract::{Path, Query, State};
use std::sync::Arc;

pub async fn page(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResponse<PageResult<Post>> {
    user.require("system:post:query")?;
    let (list, total) = state.db.page_posts(query.page, query.page_size)?;
    ok(PageResult::new(list, total, query.page, query.page_size))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<Post> {
    user.require("system:post:query")?;
    ok(state.db.get_post(&id)?)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(data): Json<PostData>,
) -> ApiResponse<Post> {
    user.require("system:post:create")?;
    ok(state.db.create_post(&data)?)
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(data): Json<PostData>,
) -> ApiResponse<Post> {
    user.require("system:post:update")?;
    ok(state.db.update_post(&id, &data)?)
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    user.require("system:post:delete")?;
    state.db.delete_post(&id)?;
    ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::{admin_user, test_state};

    #[tokio::test]
    async fn test_post_crud_via_handlers() {
        let state = test_state();
        let created = create(
            State(state.clone()),
            admin_user(),
            Json(PostData { code: "dev".into(), name: "Developer".into(), ..Default::default() }),
        )
        .await
        .unwrap();
        let post = created.0.data.unwrap();

        let listed = page(State(state), admin_user(), Query(PageQuery::default())).await.unwrap();
        assert_eq!(listed.0.data.unwrap().total, 1);
        assert_eq!(post.code, "dev");
    }
}

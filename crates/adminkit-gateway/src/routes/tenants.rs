//! Tenant management.

use super::PageQuery;
use crate::extract::{ApiResponse, AuthUser, ok};
use crate::server::AppState;
use adminkit_core::result::PageResult;
use adminkit_system::tenants::{Tenant, TenantData};
use axum::Json;
use axum::extract::{Path, Query, State};
use std::sync::Arc;

pub async fn page(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResponse<PageResult<Tenant>> {
    user.require("system:tenant:query")?;
    let (list, total) = state.db.page_tenants(query.page, query.page_size)?;
    ok(PageResult::new(list, total, query.page, query.page_size))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<Tenant> {
    user.require("system:tenant:query")?;
    ok(state.db.get_tenant(&id)?)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(data): Json<TenantData>,
) -> ApiResponse<Tenant> {
    user.require("system:tenant:create")?;
    ok(state.db.create_tenant(&data)?)
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(data): Json<TenantData>,
) -> ApiResponse<Tenant> {
    user.require("system:tenant:update")?;
    ok(state.db.update_tenant(&id, &data)?)
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    user.require("system:tenant:delete")?;
    state.db.delete_tenant(&id)?;
    ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::{admin_user, limited_user, test_state};

    #[tokio::test]
    async fn test_tenant_create_and_get() {
        let state = test_state();
        let created = create(
            State(state.clone()),
            admin_user(),
            Json(TenantData { name: "Acme".into(), ..Default::default() }),
        )
        .await
        .unwrap();
        let tenant = created.0.data.unwrap();

        let fetched = get(State(state), admin_user(), Path(tenant.id)).await.unwrap();
        assert_eq!(fetched.0.data.unwrap().name, "Acme");
    }

    #[tokio::test]
    async fn test_tenant_delete_needs_permission() {
        let state = test_state();
        let err = remove(State(state), limited_user(&["system:tenant:query"]), Path("t".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }
}

//! Audit-log and server inspection. Mounted by the `monitor` feature module.

use super::PageQuery;
use crate::extract::{ApiResponse, AuthUser, ok};
use crate::server::AppState;
use adminkit_core::result::PageResult;
use adminkit_system::logs::{LoginLog, OperateLog};
use axum::extract::{Query, State};
use std::sync::Arc;

pub async fn login_logs(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResponse<PageResult<LoginLog>> {
    user.require("monitor:login-log:query")?;
    let (list, total) = state.db.page_login_logs(query.page, query.page_size)?;
    ok(PageResult::new(list, total, query.page, query.page_size))
}

pub async fn operate_logs(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResponse<PageResult<OperateLog>> {
    user.require("monitor:operate-log:query")?;
    let (list, total) = state.db.page_operate_logs(query.page, query.page_size)?;
    ok(PageResult::new(list, total, query.page, query.page_size))
}

/// Server information endpoint.
pub async fn server_info(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResponse<serde_json::Value> {
    user.require("monitor:server:query")?;
    let uptime = state.start_time.elapsed();
    ok(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "platform": format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH),
        "uptime_secs": uptime.as_secs(),
        "server": {
            "host": state.config.server.host,
            "port": state.config.server.port,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::{admin_user, limited_user, test_state};
    use adminkit_system::logs::login_result;

    #[tokio::test]
    async fn test_login_logs_listing() {
        let state = test_state();
        state.db.record_login("admin", login_result::SUCCESS, None, None).unwrap();

        let resp = login_logs(State(state), admin_user(), Query(PageQuery::default()))
            .await
            .unwrap();
        assert_eq!(resp.0.data.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_server_info_reports_uptime() {
        let state = test_state();
        let resp = server_info(State(state), admin_user()).await.unwrap();
        let info = resp.0.data.unwrap();
        assert!(info["uptime_secs"].is_number());
        assert_eq!(info["server"]["port"], 8080);
    }

    #[tokio::test]
    async fn test_operate_logs_need_permission() {
        let state = test_state();
        let err = operate_logs(
            State(state),
            limited_user(&["monitor:login-log:query"]),
            Query(PageQuery::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }
}

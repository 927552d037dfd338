//! Operation-log middleware.
//!
//! Records one audit row per API request: method, path, resolved caller,
//! duration, and response status. The login route is excluded — credential
//! requests go through the dedicated login log instead. Audit writes must
//! never break request flow, so failures are logged and swallowed.

use crate::extract::{bearer_token, client_ip};
use crate::server::AppState;
use adminkit_system::logs::OperateLogEntry;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use std::time::Instant;

pub async fn operate_log(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if !path.starts_with("/api/") || path.ends_with("/auth/login") {
        return next.run(req).await;
    }

    let method = req.method().to_string();
    let user_id = bearer_token(req.headers())
        .and_then(|t| adminkit_auth::validate_token(t, &state.config.auth.secret).ok())
        .map(|claims| claims.sub);
    let user_ip = client_ip(req.headers());

    let started = Instant::now();
    let response = next.run(req).await;

    // path shape: /api/v1/<module>/<name>/...
    let mut segments = path.split('/').skip(3);
    let entry = OperateLogEntry {
        trace_id: uuid::Uuid::new_v4().to_string(),
        user_id,
        module: segments.next().unwrap_or_default().to_string(),
        name: segments.next().unwrap_or_default().to_string(),
        request_method: method,
        request_url: path,
        user_ip,
        duration_ms: started.elapsed().as_millis() as i64,
        result_code: response.status().as_u16() as i64,
        result_msg: None,
    };

    if let Err(e) = state.db.record_operation(&entry) {
        tracing::warn!("operation log write failed: {e}");
    }

    response
}

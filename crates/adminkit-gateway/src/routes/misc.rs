//! Unauthenticated service endpoints.

use axum::Json;

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "adminkit-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

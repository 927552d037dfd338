//! Built-in feature module components.
//!
//! Module entry files under `modules/` reference these component names; the
//! loader instantiates whichever the manifest enables. Each factory returns
//! a router fragment that the composition root merges into the application.

use crate::routes::{dicts, monitor, notices};
use crate::server::PluginRouter;
use adminkit_loader::{ComponentCatalog, ExportSpec};
use axum::Router;
use axum::routing::get;

/// The catalog of loadable components.
pub fn component_catalog() -> ComponentCatalog<PluginRouter> {
    let mut catalog = ComponentCatalog::new();
    catalog.register("notice", |_: &ExportSpec| Ok(notice_router()));
    catalog.register("dict", |_: &ExportSpec| Ok(dict_router()));
    catalog.register("monitor", |_: &ExportSpec| Ok(monitor_router()));
    catalog
}

fn notice_router() -> PluginRouter {
    Router::new()
        .route("/api/v1/system/notices", get(notices::page).post(notices::create))
        .route(
            "/api/v1/system/notices/{id}",
            get(notices::get).put(notices::update).delete(notices::remove),
        )
}

fn dict_router() -> PluginRouter {
    Router::new()
        .route("/api/v1/system/dict/types", get(dicts::page_types).post(dicts::create_type))
        .route(
            "/api/v1/system/dict/types/{id}",
            get(dicts::get_type).put(dicts::update_type).delete(dicts::remove_type),
        )
        .route("/api/v1/system/dict/data", get(dicts::list_data).post(dicts::create_data))
        .route(
            "/api/v1/system/dict/data/{id}",
            axum::routing::put(dicts::update_data).delete(dicts::remove_data),
        )
}

fn monitor_router() -> PluginRouter {
    Router::new()
        .route("/api/v1/monitor/login-logs", get(monitor::login_logs))
        .route("/api/v1/monitor/operate-logs", get(monitor::operate_logs))
        .route("/api/v1/monitor/server", get(monitor::server_info))
}

//! HTTP server and composition root.

use crate::{audit, plugins, routes};
use adminkit_core::config::AdminConfig;
use adminkit_loader::{LoadedModule, ModuleRegistry};
use adminkit_system::SystemDb;
use axum::routing::get;
use axum::{Router, middleware};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state for the gateway server.
pub struct AppState {
    pub db: SystemDb,
    pub config: AdminConfig,
    pub start_time: std::time::Instant,
}

/// Router fragment type produced by module factories.
pub type PluginRouter = Router<Arc<AppState>>;

/// Build the application router.
///
/// Loaded module routers are merged in manifest order, after the fixed
/// system routes — later modules can rely on earlier ones already being
/// registered.
pub fn build_router(state: Arc<AppState>, modules: Vec<LoadedModule<PluginRouter>>) -> Router {
    let mut api = routes::api_router();
    let mut seen = std::collections::HashSet::new();
    for module in modules {
        // a name declared twice would try to register its routes twice
        if !seen.insert(module.name.clone()) {
            tracing::warn!(module = %module.name, "duplicate module ignored");
            continue;
        }
        api = api.merge(module.unit);
    }
    let api = api.layer(middleware::from_fn_with_state(state.clone(), audit::operate_log));

    Router::new()
        .route("/health", get(routes::misc::health_check))
        .merge(api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server: open the database, seed base rows, run one module
/// loading pass, and serve.
pub async fn start(config: AdminConfig) -> anyhow::Result<()> {
    if config.is_default_secret() {
        tracing::warn!("using the built-in JWT secret; set [auth].secret before going to production");
    }

    let db = SystemDb::open(Path::new(&config.database.path))?;
    adminkit_system::seed::ensure_defaults(&db)?;

    let registry = ModuleRegistry::new(
        &config.modules.manifest,
        &config.modules.dir,
        plugins::component_catalog(),
    );
    let modules = registry.load_all().await;
    tracing::info!("{} feature module(s) active", modules.len());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState {
        db,
        config,
        start_time: std::time::Instant::now(),
    });
    let app = build_router(state, modules);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 admin gateway listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// In-memory state for handler tests.
    pub fn test_state() -> Arc<AppState> {
        let db = SystemDb::open(Path::new(":memory:")).unwrap();
        adminkit_system::seed::ensure_defaults(&db).unwrap();
        Arc::new(AppState {
            db,
            config: AdminConfig::default(),
            start_time: std::time::Instant::now(),
        })
    }

    /// A caller holding the super admin role.
    pub fn admin_user() -> crate::extract::AuthUser {
        crate::extract::AuthUser {
            id: "admin-test".into(),
            username: "admin".into(),
            roles: vec![adminkit_auth::SUPER_ADMIN_ROLE.into()],
            permissions: vec![],
            tenant_id: None,
        }
    }

    /// A caller with exactly the given permissions and no roles.
    pub fn limited_user(permissions: &[&str]) -> crate::extract::AuthUser {
        crate::extract::AuthUser {
            id: "limited-test".into(),
            username: "limited".into(),
            roles: vec![],
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
            tenant_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_route_is_public() {
        let app = build_router(testing::test_state(), Vec::new());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_route_rejects_anonymous() {
        let app = build_router(testing::test_state(), Vec::new());
        let response = app
            .oneshot(Request::builder().uri("/api/v1/system/users").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_module_routers_are_merged() {
        let state = testing::test_state();
        let catalog = plugins::component_catalog();
        let notice_router = catalog
            .create(&adminkit_loader::ExportSpec {
                name: "default".into(),
                component: "notice".into(),
                config: toml::Table::new(),
            })
            .unwrap();
        let modules = vec![adminkit_loader::LoadedModule {
            name: "notice".into(),
            version: "0.1.0".into(),
            unit: notice_router,
        }];

        let app = build_router(state, modules);
        // mounted route answers (401 without a token, not 404)
        let response = app
            .oneshot(Request::builder().uri("/api/v1/system/notices").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unloaded_module_routes_absent() {
        let app = build_router(testing::test_state(), Vec::new());
        let response = app
            .oneshot(Request::builder().uri("/api/v1/system/notices").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

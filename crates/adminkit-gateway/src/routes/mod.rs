//! API route handlers, one module per subsystem.

pub mod auth;
pub mod configs;
pub mod depts;
pub mod dicts;
pub mod menus;
pub mod misc;
pub mod monitor;
pub mod notices;
pub mod posts;
pub mod roles;
pub mod tenants;
pub mod users;

use crate::server::{AppState, PluginRouter};
use axum::Router;
use axum::routing::{get, post, put};
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters shared by every paged listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub keyword: Option<String>,
}

fn default_page() -> u32 { 1 }
fn default_page_size() -> u32 { 20 }

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: default_page(), page_size: default_page_size(), keyword: None }
    }
}

/// The fixed system routes — always mounted, before any module router.
pub fn api_router() -> PluginRouter {
    Router::<Arc<AppState>>::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/profile", get(auth::profile))
        .route("/api/v1/system/users", get(users::page).post(users::create))
        .route("/api/v1/system/users/{id}", get(users::get).put(users::update).delete(users::remove))
        .route("/api/v1/system/users/{id}/password", put(users::reset_password))
        .route("/api/v1/system/users/{id}/roles", get(users::role_ids).put(users::assign_roles))
        .route("/api/v1/system/roles", get(roles::page).post(roles::create))
        .route("/api/v1/system/roles/{id}", get(roles::get).put(roles::update).delete(roles::remove))
        .route("/api/v1/system/roles/{id}/menus", get(roles::menu_ids).put(roles::assign_menus))
        .route("/api/v1/system/menus", get(menus::page).post(menus::create))
        .route("/api/v1/system/menus/tree", get(menus::tree))
        .route("/api/v1/system/menus/{id}", get(menus::get).put(menus::update).delete(menus::remove))
        .route("/api/v1/system/depts", get(depts::page).post(depts::create))
        .route("/api/v1/system/depts/tree", get(depts::tree))
        .route("/api/v1/system/depts/{id}", get(depts::get).put(depts::update).delete(depts::remove))
        .route("/api/v1/system/posts", get(posts::page).post(posts::create))
        .route("/api/v1/system/posts/{id}", get(posts::get).put(posts::update).delete(posts::remove))
        .route("/api/v1/system/tenants", get(tenants::page).post(tenants::create))
        .route("/api/v1/system/tenants/{id}", get(tenants::get).put(tenants::update).delete(tenants::remove))
        .route("/api/v1/system/configs", get(configs::page).post(configs::create))
        .route("/api/v1/system/configs/{id}", get(configs::get).put(configs::update).delete(configs::remove))
}

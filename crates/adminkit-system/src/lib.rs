//! # AdminKit System
//!
//! SQLite persistence for the admin domain: users, roles, menus,
//! departments, posts, tenants, dictionaries, configs, notices, and the
//! login/operation audit logs. One [`SystemDb`] owns the connection; entity
//! modules contribute `impl` blocks.

pub mod configs;
pub mod db;
pub mod depts;
pub mod dicts;
pub mod logs;
pub mod menus;
pub mod notices;
pub mod posts;
pub mod roles;
pub mod seed;
pub mod tenants;
pub mod users;

pub use db::SystemDb;

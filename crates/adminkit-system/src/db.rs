//! System database — SQLite schema for the admin domain.
//!
//! Every table carries the shared base columns (`creator`, `updater`,
//! timestamps, the `deleted` soft-delete flag, `tenant_id`); reads filter
//! `deleted = 0` and deletes flip the flag.

use adminkit_core::error::{AdminError, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// System database manager.
pub struct SystemDb {
    conn: Mutex<Connection>,
}

impl SystemDb {
    /// Open or create the system database.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }
        let conn = Connection::open(path)
            .map_err(|e| AdminError::Database(format!("DB open error: {e}")))?;
        let db = Self { conn: Mutex::new(conn) };
        db.migrate()?;
        Ok(db)
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run schema migrations.
    fn migrate(&self) -> Result<()> {
        self.conn().execute_batch("
            CREATE TABLE IF NOT EXISTS system_users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                nickname TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                email TEXT,
                mobile TEXT,
                sex INTEGER DEFAULT 0,
                avatar TEXT,
                status INTEGER DEFAULT 0,
                dept_id TEXT,
                post_ids TEXT,
                remark TEXT,
                login_ip TEXT,
                login_date TEXT,
                creator TEXT,
                updater TEXT,
                deleted INTEGER DEFAULT 0,
                tenant_id TEXT,
                create_time TEXT DEFAULT (datetime('now')),
                update_time TEXT DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS system_roles (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                code TEXT NOT NULL,
                sort INTEGER DEFAULT 0,
                data_scope INTEGER DEFAULT 1,
                status INTEGER DEFAULT 0,
                type INTEGER DEFAULT 2,
                remark TEXT,
                creator TEXT,
                updater TEXT,
                deleted INTEGER DEFAULT 0,
                tenant_id TEXT,
                create_time TEXT DEFAULT (datetime('now')),
                update_time TEXT DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS system_menus (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                permission TEXT DEFAULT '',
                type INTEGER NOT NULL,
                sort INTEGER DEFAULT 0,
                parent_id TEXT DEFAULT '0',
                path TEXT DEFAULT '',
                icon TEXT DEFAULT '#',
                component TEXT,
                component_name TEXT,
                status INTEGER DEFAULT 0,
                visible INTEGER DEFAULT 1,
                keep_alive INTEGER DEFAULT 1,
                creator TEXT,
                updater TEXT,
                deleted INTEGER DEFAULT 0,
                create_time TEXT DEFAULT (datetime('now')),
                update_time TEXT DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS system_depts (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                parent_id TEXT DEFAULT '0',
                sort INTEGER DEFAULT 0,
                leader_user_id TEXT,
                phone TEXT,
                email TEXT,
                status INTEGER DEFAULT 0,
                creator TEXT,
                updater TEXT,
                deleted INTEGER DEFAULT 0,
                tenant_id TEXT,
                create_time TEXT DEFAULT (datetime('now')),
                update_time TEXT DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS system_posts (
                id TEXT PRIMARY KEY,
                code TEXT NOT NULL,
                name TEXT NOT NULL,
                sort INTEGER DEFAULT 0,
                status INTEGER DEFAULT 0,
                remark TEXT,
                creator TEXT,
                updater TEXT,
                deleted INTEGER DEFAULT 0,
                tenant_id TEXT,
                create_time TEXT DEFAULT (datetime('now')),
                update_time TEXT DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS system_tenants (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                contact_user_id TEXT,
                contact_name TEXT,
                contact_mobile TEXT,
                status INTEGER DEFAULT 0,
                package_id TEXT,
                expire_time TEXT,
                account_count INTEGER DEFAULT 0,
                creator TEXT,
                updater TEXT,
                deleted INTEGER DEFAULT 0,
                create_time TEXT DEFAULT (datetime('now')),
                update_time TEXT DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS system_user_roles (
                user_id TEXT NOT NULL,
                role_id TEXT NOT NULL,
                PRIMARY KEY (user_id, role_id)
            );

            CREATE TABLE IF NOT EXISTS system_role_menus (
                role_id TEXT NOT NULL,
                menu_id TEXT NOT NULL,
                PRIMARY KEY (role_id, menu_id)
            );

            CREATE TABLE IF NOT EXISTS system_dict_types (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                type TEXT UNIQUE NOT NULL,
                status INTEGER DEFAULT 0,
                remark TEXT,
                creator TEXT,
                updater TEXT,
                deleted INTEGER DEFAULT 0,
                create_time TEXT DEFAULT (datetime('now')),
                update_time TEXT DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS system_dict_data (
                id TEXT PRIMARY KEY,
                sort INTEGER DEFAULT 0,
                label TEXT NOT NULL,
                value TEXT NOT NULL,
                dict_type TEXT NOT NULL,
                status INTEGER DEFAULT 0,
                color_type TEXT,
                css_class TEXT,
                remark TEXT,
                creator TEXT,
                updater TEXT,
                deleted INTEGER DEFAULT 0,
                create_time TEXT DEFAULT (datetime('now')),
                update_time TEXT DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS system_configs (
                id TEXT PRIMARY KEY,
                category TEXT NOT NULL,
                name TEXT NOT NULL,
                config_key TEXT UNIQUE NOT NULL,
                value TEXT NOT NULL,
                type INTEGER DEFAULT 0,
                visible INTEGER DEFAULT 1,
                remark TEXT,
                creator TEXT,
                updater TEXT,
                deleted INTEGER DEFAULT 0,
                create_time TEXT DEFAULT (datetime('now')),
                update_time TEXT DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS system_notices (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                type INTEGER DEFAULT 1,
                content TEXT NOT NULL,
                status INTEGER DEFAULT 0,
                creator TEXT,
                updater TEXT,
                deleted INTEGER DEFAULT 0,
                tenant_id TEXT,
                create_time TEXT DEFAULT (datetime('now')),
                update_time TEXT DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS system_login_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                log_type INTEGER DEFAULT 100,
                trace_id TEXT,
                username TEXT NOT NULL,
                result INTEGER NOT NULL,
                user_ip TEXT,
                user_agent TEXT,
                tenant_id TEXT,
                create_time TEXT DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS system_operate_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                trace_id TEXT,
                user_id TEXT,
                module TEXT,
                name TEXT,
                request_method TEXT,
                request_url TEXT,
                user_ip TEXT,
                duration_ms INTEGER DEFAULT 0,
                result_code INTEGER DEFAULT 0,
                result_msg TEXT,
                tenant_id TEXT,
                create_time TEXT DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_login_logs_time ON system_login_logs (create_time);
            CREATE INDEX IF NOT EXISTS idx_operate_logs_time ON system_operate_logs (create_time);
        ").map_err(|e| AdminError::Database(format!("Migration error: {e}")))?;
        Ok(())
    }
}

/// New uuid string id.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// LIMIT/OFFSET values for a 1-based page.
pub(crate) fn page_bounds(page: u32, page_size: u32) -> (i64, i64) {
    let size = page_size.clamp(1, 500) as i64;
    let offset = (page.max(1) as i64 - 1) * size;
    (size, offset)
}

#[cfg(test)]
pub(crate) fn memory_db() -> SystemDb {
    SystemDb::open(Path::new(":memory:")).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_migrate() {
        let db = memory_db();
        // migration is idempotent
        db.migrate().unwrap();
    }

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(1, 20), (20, 0));
        assert_eq!(page_bounds(3, 10), (10, 20));
        // page 0 is treated as page 1, size is clamped
        assert_eq!(page_bounds(0, 0), (1, 0));
    }
}

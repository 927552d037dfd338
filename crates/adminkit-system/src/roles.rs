//! Roles, role assignment, and permission aggregation.

use crate::db::{SystemDb, new_id, page_bounds};
use adminkit_core::error::{AdminError, Result};
use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};

/// Role record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    /// Role permission string, e.g. `super_admin`.
    pub code: String,
    pub sort: i64,
    pub data_scope: i64,
    pub status: i64,
    /// 1 built-in, 2 custom.
    #[serde(rename = "type")]
    pub role_type: i64,
    pub remark: Option<String>,
    pub create_time: String,
    pub update_time: String,
}

/// Fields accepted when creating or updating a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleData {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub sort: i64,
    #[serde(default = "default_data_scope")]
    pub data_scope: i64,
    #[serde(default)]
    pub status: i64,
    #[serde(default = "default_role_type", rename = "type")]
    pub role_type: i64,
    #[serde(default)]
    pub remark: Option<String>,
}

fn default_data_scope() -> i64 { 1 }
fn default_role_type() -> i64 { 2 }

impl Default for RoleData {
    fn default() -> Self {
        Self {
            name: String::new(),
            code: String::new(),
            sort: 0,
            data_scope: default_data_scope(),
            status: 0,
            role_type: default_role_type(),
            remark: None,
        }
    }
}

const ROLE_COLS: &str = "id,name,code,sort,data_scope,status,type,remark,create_time,update_time";

fn role_from_row(row: &Row) -> rusqlite::Result<Role> {
    Ok(Role {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
        sort: row.get(3)?,
        data_scope: row.get(4)?,
        status: row.get(5)?,
        role_type: row.get(6)?,
        remark: row.get(7)?,
        create_time: row.get(8)?,
        update_time: row.get(9)?,
    })
}

impl SystemDb {
    // ── Role CRUD ────────────────────────────────────

    pub fn create_role(&self, data: &RoleData) -> Result<Role> {
        let id = new_id();
        self.conn().execute(
            "INSERT INTO system_roles (id,name,code,sort,data_scope,status,type,remark)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            params![id, data.name, data.code, data.sort, data.data_scope, data.status, data.role_type, data.remark],
        ).map_err(|e| AdminError::Database(format!("insert role: {e}")))?;
        self.get_role(&id)
    }

    pub fn get_role(&self, id: &str) -> Result<Role> {
        self.conn().query_row(
            &format!("SELECT {ROLE_COLS} FROM system_roles WHERE id=?1 AND deleted=0"),
            params![id],
            role_from_row,
        ).map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AdminError::NotFound(format!("role {id}")),
            other => AdminError::Database(format!("get role: {other}")),
        })
    }

    /// Find a role by its code.
    pub fn find_role_by_code(&self, code: &str) -> Result<Option<Role>> {
        let result = self.conn().query_row(
            &format!("SELECT {ROLE_COLS} FROM system_roles WHERE code=?1 AND deleted=0"),
            params![code],
            role_from_row,
        );
        match result {
            Ok(r) => Ok(Some(r)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AdminError::Database(format!("find role: {e}"))),
        }
    }

    pub fn page_roles(&self, page: u32, page_size: u32) -> Result<(Vec<Role>, i64)> {
        let (limit, offset) = page_bounds(page, page_size);
        let conn = self.conn();

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM system_roles WHERE deleted=0", [], |r| r.get(0),
        ).map_err(|e| AdminError::Database(format!("count roles: {e}")))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {ROLE_COLS} FROM system_roles WHERE deleted=0 ORDER BY sort, create_time LIMIT ?1 OFFSET ?2"
        )).map_err(|e| AdminError::Database(format!("prepare: {e}")))?;

        let roles = stmt.query_map(params![limit, offset], role_from_row)
            .map_err(|e| AdminError::Database(format!("query roles: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok((roles, total))
    }

    pub fn update_role(&self, id: &str, data: &RoleData) -> Result<Role> {
        let changed = self.conn().execute(
            "UPDATE system_roles SET name=?1, code=?2, sort=?3, data_scope=?4, status=?5, type=?6,
             remark=?7, update_time=datetime('now') WHERE id=?8 AND deleted=0",
            params![data.name, data.code, data.sort, data.data_scope, data.status, data.role_type, data.remark, id],
        ).map_err(|e| AdminError::Database(format!("update role: {e}")))?;
        if changed == 0 {
            return Err(AdminError::NotFound(format!("role {id}")));
        }
        self.get_role(id)
    }

    pub fn delete_role(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE system_roles SET deleted=1, update_time=datetime('now') WHERE id=?1",
            params![id],
        ).map_err(|e| AdminError::Database(format!("delete role: {e}")))?;
        Ok(())
    }

    // ── Assignment ────────────────────────────────────

    /// Replace a user's role set.
    pub fn assign_user_roles(&self, user_id: &str, role_ids: &[String]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()
            .map_err(|e| AdminError::Database(format!("begin: {e}")))?;
        tx.execute("DELETE FROM system_user_roles WHERE user_id=?1", params![user_id])
            .map_err(|e| AdminError::Database(format!("clear user roles: {e}")))?;
        for role_id in role_ids {
            tx.execute(
                "INSERT OR IGNORE INTO system_user_roles (user_id, role_id) VALUES (?1,?2)",
                params![user_id, role_id],
            ).map_err(|e| AdminError::Database(format!("assign role: {e}")))?;
        }
        tx.commit().map_err(|e| AdminError::Database(format!("commit: {e}")))
    }

    /// Replace a role's menu set.
    pub fn assign_role_menus(&self, role_id: &str, menu_ids: &[String]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()
            .map_err(|e| AdminError::Database(format!("begin: {e}")))?;
        tx.execute("DELETE FROM system_role_menus WHERE role_id=?1", params![role_id])
            .map_err(|e| AdminError::Database(format!("clear role menus: {e}")))?;
        for menu_id in menu_ids {
            tx.execute(
                "INSERT OR IGNORE INTO system_role_menus (role_id, menu_id) VALUES (?1,?2)",
                params![role_id, menu_id],
            ).map_err(|e| AdminError::Database(format!("assign menu: {e}")))?;
        }
        tx.commit().map_err(|e| AdminError::Database(format!("commit: {e}")))
    }

    /// Role ids assigned to a user.
    pub fn user_role_ids(&self, user_id: &str) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT role_id FROM system_user_roles WHERE user_id=?1")
            .map_err(|e| AdminError::Database(format!("prepare: {e}")))?;
        let ids = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))
            .map_err(|e| AdminError::Database(format!("query: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(ids)
    }

    /// Menu ids granted to a role.
    pub fn role_menu_ids(&self, role_id: &str) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT menu_id FROM system_role_menus WHERE role_id=?1")
            .map_err(|e| AdminError::Database(format!("prepare: {e}")))?;
        let ids = stmt.query_map(params![role_id], |row| row.get::<_, String>(0))
            .map_err(|e| AdminError::Database(format!("query: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(ids)
    }

    // ── Permission aggregation ────────────────────────────────────

    /// Active role codes held by a user.
    pub fn user_role_codes(&self, user_id: &str) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT r.code FROM system_user_roles ur
             JOIN system_roles r ON r.id = ur.role_id AND r.deleted=0 AND r.status=0
             WHERE ur.user_id=?1 ORDER BY r.sort",
        ).map_err(|e| AdminError::Database(format!("prepare: {e}")))?;
        let codes = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))
            .map_err(|e| AdminError::Database(format!("query: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(codes)
    }

    /// Distinct permission strings reachable from a user's active roles
    /// through their granted menus. Disabled roles and menus drop out.
    pub fn user_permissions(&self, user_id: &str) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT m.permission FROM system_user_roles ur
             JOIN system_roles r ON r.id = ur.role_id AND r.deleted=0 AND r.status=0
             JOIN system_role_menus rm ON rm.role_id = r.id
             JOIN system_menus m ON m.id = rm.menu_id AND m.deleted=0 AND m.status=0
             WHERE ur.user_id=?1 AND m.permission != ''
             ORDER BY m.permission",
        ).map_err(|e| AdminError::Database(format!("prepare: {e}")))?;
        let permissions = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))
            .map_err(|e| AdminError::Database(format!("query: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_db;
    use crate::menus::MenuData;
    use crate::users::UserData;

    fn role(code: &str) -> RoleData {
        RoleData { name: code.to_uppercase(), code: code.into(), ..Default::default() }
    }

    fn menu(permission: &str) -> MenuData {
        MenuData {
            name: permission.into(),
            permission: permission.into(),
            menu_type: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_role_crud() {
        let db = memory_db();
        let r = db.create_role(&role("ops")).unwrap();
        assert_eq!(r.code, "ops");
        assert_eq!(r.data_scope, 1);
        assert_eq!(r.role_type, 2);

        let (list, total) = db.page_roles(1, 10).unwrap();
        assert_eq!(total, 1);
        assert_eq!(list[0].id, r.id);

        db.delete_role(&r.id).unwrap();
        assert!(db.get_role(&r.id).is_err());
    }

    #[test]
    fn test_find_role_by_code() {
        let db = memory_db();
        db.create_role(&role("auditor")).unwrap();
        assert!(db.find_role_by_code("auditor").unwrap().is_some());
        assert!(db.find_role_by_code("missing").unwrap().is_none());
    }

    #[test]
    fn test_assignment_replaces_previous_set() {
        let db = memory_db();
        let user = db.create_user(&UserData { username: "u".into(), nickname: "u".into(), ..Default::default() }, "$h").unwrap();
        let a = db.create_role(&role("a")).unwrap();
        let b = db.create_role(&role("b")).unwrap();

        db.assign_user_roles(&user.id, &[a.id.clone(), b.id.clone()]).unwrap();
        assert_eq!(db.user_role_ids(&user.id).unwrap().len(), 2);

        db.assign_user_roles(&user.id, &[b.id.clone()]).unwrap();
        assert_eq!(db.user_role_ids(&user.id).unwrap(), vec![b.id]);
    }

    #[test]
    fn test_permission_aggregation() {
        let db = memory_db();
        let user = db.create_user(&UserData { username: "p".into(), nickname: "p".into(), ..Default::default() }, "$h").unwrap();
        let r = db.create_role(&role("ops")).unwrap();
        let m1 = db.create_menu(&menu("system:user:query")).unwrap();
        let m2 = db.create_menu(&menu("system:user:create")).unwrap();

        db.assign_role_menus(&r.id, &[m1.id.clone(), m2.id.clone()]).unwrap();
        db.assign_user_roles(&user.id, &[r.id.clone()]).unwrap();

        assert_eq!(db.user_role_codes(&user.id).unwrap(), vec!["ops"]);
        let perms = db.user_permissions(&user.id).unwrap();
        assert_eq!(perms, vec!["system:user:create", "system:user:query"]);
    }

    #[test]
    fn test_disabled_role_drops_permissions() {
        let db = memory_db();
        let user = db.create_user(&UserData { username: "d".into(), nickname: "d".into(), ..Default::default() }, "$h").unwrap();
        let r = db.create_role(&role("ops")).unwrap();
        let m = db.create_menu(&menu("system:user:query")).unwrap();
        db.assign_role_menus(&r.id, &[m.id.clone()]).unwrap();
        db.assign_user_roles(&user.id, &[r.id.clone()]).unwrap();

        let mut data = role("ops");
        data.status = 1; // disable
        db.update_role(&r.id, &data).unwrap();

        assert!(db.user_role_codes(&user.id).unwrap().is_empty());
        assert!(db.user_permissions(&user.id).unwrap().is_empty());
    }
}

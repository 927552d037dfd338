//! User accounts.

use crate::db::{SystemDb, new_id, page_bounds};
use adminkit_core::error::{AdminError, Result};
use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};

/// User record. The password hash never leaves this module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub nickname: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub sex: i64,
    pub avatar: Option<String>,
    pub status: i64,
    pub dept_id: Option<String>,
    pub post_ids: Vec<String>,
    pub remark: Option<String>,
    pub login_ip: Option<String>,
    pub login_date: Option<String>,
    pub tenant_id: Option<String>,
    pub create_time: String,
    pub update_time: String,
}

/// Fields accepted when creating or updating a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserData {
    pub username: String,
    pub nickname: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub sex: i64,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub dept_id: Option<String>,
    #[serde(default)]
    pub post_ids: Vec<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

const USER_COLS: &str = "id,username,nickname,email,mobile,sex,avatar,status,dept_id,post_ids,remark,login_ip,login_date,tenant_id,create_time,update_time";

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        nickname: row.get(2)?,
        email: row.get(3)?,
        mobile: row.get(4)?,
        sex: row.get(5)?,
        avatar: row.get(6)?,
        status: row.get(7)?,
        dept_id: row.get(8)?,
        post_ids: split_ids(row.get::<_, Option<String>>(9)?),
        remark: row.get(10)?,
        login_ip: row.get(11)?,
        login_date: row.get(12)?,
        tenant_id: row.get(13)?,
        create_time: row.get(14)?,
        update_time: row.get(15)?,
    })
}

// post ids live in one comma-joined column
fn join_ids(ids: &[String]) -> Option<String> {
    if ids.is_empty() { None } else { Some(ids.join(",")) }
}

fn split_ids(value: Option<String>) -> Vec<String> {
    value
        .map(|v| v.split(',').filter(|s| !s.is_empty()).map(str::to_string).collect())
        .unwrap_or_default()
}

impl SystemDb {
    /// Create a user. The caller supplies an already-hashed password.
    pub fn create_user(&self, data: &UserData, password_hash: &str) -> Result<User> {
        let id = new_id();
        self.conn().execute(
            "INSERT INTO system_users (id,username,nickname,password_hash,email,mobile,sex,avatar,status,dept_id,post_ids,remark,tenant_id)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13)",
            params![
                id, data.username, data.nickname, password_hash, data.email, data.mobile,
                data.sex, data.avatar, data.status, data.dept_id, join_ids(&data.post_ids),
                data.remark, data.tenant_id
            ],
        ).map_err(|e| AdminError::Database(format!("insert user: {e}")))?;
        self.get_user(&id)
    }

    /// Get a user by id.
    pub fn get_user(&self, id: &str) -> Result<User> {
        self.conn().query_row(
            &format!("SELECT {USER_COLS} FROM system_users WHERE id=?1 AND deleted=0"),
            params![id],
            user_from_row,
        ).map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AdminError::NotFound(format!("user {id}")),
            other => AdminError::Database(format!("get user: {other}")),
        })
    }

    /// Look up a user by account name, returning the password hash for
    /// verification. Login only.
    pub fn find_user_by_username(&self, username: &str) -> Result<Option<(User, String)>> {
        let result = self.conn().query_row(
            &format!("SELECT {USER_COLS},password_hash FROM system_users WHERE username=?1 AND deleted=0"),
            params![username],
            |row| Ok((user_from_row(row)?, row.get::<_, String>(16)?)),
        );
        match result {
            Ok(r) => Ok(Some(r)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AdminError::Database(format!("find user: {e}"))),
        }
    }

    /// Page through users, optionally filtering on username/nickname.
    pub fn page_users(&self, page: u32, page_size: u32, keyword: Option<&str>) -> Result<(Vec<User>, i64)> {
        let (limit, offset) = page_bounds(page, page_size);
        let pattern = keyword.map(|k| format!("%{k}%")).unwrap_or_else(|| "%".into());
        let conn = self.conn();

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM system_users WHERE deleted=0 AND (username LIKE ?1 OR nickname LIKE ?1)",
            params![pattern],
            |r| r.get(0),
        ).map_err(|e| AdminError::Database(format!("count users: {e}")))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLS} FROM system_users WHERE deleted=0 AND (username LIKE ?1 OR nickname LIKE ?1)
             ORDER BY create_time DESC LIMIT ?2 OFFSET ?3"
        )).map_err(|e| AdminError::Database(format!("prepare: {e}")))?;

        let users = stmt.query_map(params![pattern, limit, offset], user_from_row)
            .map_err(|e| AdminError::Database(format!("query users: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok((users, total))
    }

    /// Update profile fields.
    pub fn update_user(&self, id: &str, data: &UserData) -> Result<User> {
        let changed = self.conn().execute(
            "UPDATE system_users SET username=?1, nickname=?2, email=?3, mobile=?4, sex=?5, avatar=?6,
             status=?7, dept_id=?8, post_ids=?9, remark=?10, update_time=datetime('now')
             WHERE id=?11 AND deleted=0",
            params![
                data.username, data.nickname, data.email, data.mobile, data.sex, data.avatar,
                data.status, data.dept_id, join_ids(&data.post_ids), data.remark, id
            ],
        ).map_err(|e| AdminError::Database(format!("update user: {e}")))?;
        if changed == 0 {
            return Err(AdminError::NotFound(format!("user {id}")));
        }
        self.get_user(id)
    }

    /// Replace a user's password hash.
    pub fn reset_user_password(&self, id: &str, password_hash: &str) -> Result<()> {
        let changed = self.conn().execute(
            "UPDATE system_users SET password_hash=?1, update_time=datetime('now') WHERE id=?2 AND deleted=0",
            params![password_hash, id],
        ).map_err(|e| AdminError::Database(format!("reset password: {e}")))?;
        if changed == 0 {
            return Err(AdminError::NotFound(format!("user {id}")));
        }
        Ok(())
    }

    /// Record a successful login.
    pub fn update_login_info(&self, id: &str, ip: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE system_users SET login_ip=?1, login_date=datetime('now') WHERE id=?2",
            params![ip, id],
        ).map_err(|e| AdminError::Database(format!("update login info: {e}")))?;
        Ok(())
    }

    /// Soft-delete a user.
    pub fn delete_user(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE system_users SET deleted=1, update_time=datetime('now') WHERE id=?1",
            params![id],
        ).map_err(|e| AdminError::Database(format!("delete user: {e}")))?;
        Ok(())
    }
}

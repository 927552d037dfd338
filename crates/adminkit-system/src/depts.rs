//! Departments.

use crate::db::{SystemDb, new_id, page_bounds};
use crate::menus::ROOT_PARENT;
use adminkit_core::error::{AdminError, Result};
use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};

/// Department record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dept {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    pub sort: i64,
    pub leader_user_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: i64,
    pub create_time: String,
    pub update_time: String,
}

/// Fields accepted when creating or updating a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeptData {
    pub name: String,
    #[serde(default = "default_parent")]
    pub parent_id: String,
    #[serde(default)]
    pub sort: i64,
    #[serde(default)]
    pub leader_user_id: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: i64,
}

fn default_parent() -> String { ROOT_PARENT.into() }

impl Default for DeptData {
    fn default() -> Self {
        Self {
            name: String::new(),
            parent_id: default_parent(),
            sort: 0,
            leader_user_id: None,
            phone: None,
            email: None,
            status: 0,
        }
    }
}

/// A department with its children.
#[derive(Debug, Clone, Serialize)]
pub struct DeptTree {
    #[serde(flatten)]
    pub dept: Dept,
    pub children: Vec<DeptTree>,
}

/// Assemble a tree from a flat, sort-ordered list.
pub fn build_dept_tree(depts: &[Dept], parent_id: &str) -> Vec<DeptTree> {
    depts
        .iter()
        .filter(|d| d.parent_id == parent_id)
        .map(|d| DeptTree { dept: d.clone(), children: build_dept_tree(depts, &d.id) })
        .collect()
}

const DEPT_COLS: &str = "id,name,parent_id,sort,leader_user_id,phone,email,status,create_time,update_time";

fn dept_from_row(row: &Row) -> rusqlite::Result<Dept> {
    Ok(Dept {
        id: row.get(0)?,
        name: row.get(1)?,
        parent_id: row.get(2)?,
        sort: row.get(3)?,
        leader_user_id: row.get(4)?,
        phone: row.get(5)?,
        email: row.get(6)?,
        status: row.get(7)?,
        create_time: row.get(8)?,
        update_time: row.get(9)?,
    })
}

impl SystemDb {
    pub fn create_dept(&self, data: &DeptData) -> Result<Dept> {
        let id = new_id();
        self.conn().execute(
            "INSERT INTO system_depts (id,name,parent_id,sort,leader_user_id,phone,email,status)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            params![id, data.name, data.parent_id, data.sort, data.leader_user_id, data.phone, data.email, data.status],
        ).map_err(|e| AdminError::Database(format!("insert dept: {e}")))?;
        self.get_dept(&id)
    }

    pub fn get_dept(&self, id: &str) -> Result<Dept> {
        self.conn().query_row(
            &format!("SELECT {DEPT_COLS} FROM system_depts WHERE id=?1 AND deleted=0"),
            params![id],
            dept_from_row,
        ).map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AdminError::NotFound(format!("dept {id}")),
            other => AdminError::Database(format!("get dept: {other}")),
        })
    }

    pub fn list_depts(&self) -> Result<Vec<Dept>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {DEPT_COLS} FROM system_depts WHERE deleted=0 ORDER BY sort, create_time"
        )).map_err(|e| AdminError::Database(format!("prepare: {e}")))?;
        let depts = stmt.query_map([], dept_from_row)
            .map_err(|e| AdminError::Database(format!("query depts: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(depts)
    }

    pub fn page_depts(&self, page: u32, page_size: u32) -> Result<(Vec<Dept>, i64)> {
        let (limit, offset) = page_bounds(page, page_size);
        let conn = self.conn();

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM system_depts WHERE deleted=0", [], |r| r.get(0),
        ).map_err(|e| AdminError::Database(format!("count depts: {e}")))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {DEPT_COLS} FROM system_depts WHERE deleted=0 ORDER BY sort, create_time LIMIT ?1 OFFSET ?2"
        )).map_err(|e| AdminError::Database(format!("prepare: {e}")))?;
        let depts = stmt.query_map(params![limit, offset], dept_from_row)
            .map_err(|e| AdminError::Database(format!("query depts: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok((depts, total))
    }

    pub fn update_dept(&self, id: &str, data: &DeptData) -> Result<Dept> {
        let changed = self.conn().execute(
            "UPDATE system_depts SET name=?1, parent_id=?2, sort=?3, leader_user_id=?4, phone=?5,
             email=?6, status=?7, update_time=datetime('now') WHERE id=?8 AND deleted=0",
            params![data.name, data.parent_id, data.sort, data.leader_user_id, data.phone, data.email, data.status, id],
        ).map_err(|e| AdminError::Database(format!("update dept: {e}")))?;
        if changed == 0 {
            return Err(AdminError::NotFound(format!("dept {id}")));
        }
        self.get_dept(id)
    }

    pub fn delete_dept(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE system_depts SET deleted=1, update_time=datetime('now') WHERE id=?1",
            params![id],
        ).map_err(|e| AdminError::Database(format!("delete dept: {e}")))?;
        Ok(())
    }
}

//! Notices and announcements.

use crate::db::{SystemDb, new_id, page_bounds};
use adminkit_core::error::{AdminError, Result};
use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};

/// Notice record. `notice_type`: 1 notification, 2 announcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub notice_type: i64,
    pub content: String,
    pub status: i64,
    pub create_time: String,
    pub update_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeData {
    pub title: String,
    #[serde(default = "default_notice_type", rename = "type")]
    pub notice_type: i64,
    pub content: String,
    #[serde(default)]
    pub status: i64,
}

fn default_notice_type() -> i64 { 1 }

impl Default for NoticeData {
    fn default() -> Self {
        Self {
            title: String::new(),
            notice_type: default_notice_type(),
            content: String::new(),
            status: 0,
        }
    }
}

const NOTICE_COLS: &str = "id,title,type,content,status,create_time,update_time";

fn notice_from_row(row: &Row) -> rusqlite::Result<Notice> {
    Ok(Notice {
        id: row.get(0)?,
        title: row.get(1)?,
        notice_type: row.get(2)?,
        content: row.get(3)?,
        status: row.get(4)?,
        create_time: row.get(5)?,
        update_time: row.get(6)?,
    })
}

impl SystemDb {
    pub fn create_notice(&self, data: &NoticeData) -> Result<Notice> {
        let id = new_id();
        self.conn().execute(
            "INSERT INTO system_notices (id,title,type,content,status) VALUES (?1,?2,?3,?4,?5)",
            params![id, data.title, data.notice_type, data.content, data.status],
        ).map_err(|e| AdminError::Database(format!("insert notice: {e}")))?;
        self.get_notice(&id)
    }

    pub fn get_notice(&self, id: &str) -> Result<Notice> {
        self.conn().query_row(
            &format!("SELECT {NOTICE_COLS} FROM system_notices WHERE id=?1 AND deleted=0"),
            params![id],
            notice_from_row,
        ).map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AdminError::NotFound(format!("notice {id}")),
            other => AdminError::Database(format!("get notice: {other}")),
        })
    }

    pub fn page_notices(&self, page: u32, page_size: u32) -> Result<(Vec<Notice>, i64)> {
        let (limit, offset) = page_bounds(page, page_size);
        let conn = self.conn();

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM system_notices WHERE deleted=0", [], |r| r.get(0),
        ).map_err(|e| AdminError::Database(format!("count notices: {e}")))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {NOTICE_COLS} FROM system_notices WHERE deleted=0 ORDER BY create_time DESC LIMIT ?1 OFFSET ?2"
        )).map_err(|e| AdminError::Database(format!("prepare: {e}")))?;
        let notices = stmt.query_map(params![limit, offset], notice_from_row)
            .map_err(|e| AdminError::Database(format!("query notices: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok((notices, total))
    }

    pub fn update_notice(&self, id: &str, data: &NoticeData) -> Result<Notice> {
        let changed = self.conn().execute(
            "UPDATE system_notices SET title=?1, type=?2, content=?3, status=?4,
             update_time=datetime('now') WHERE id=?5 AND deleted=0",
            params![data.title, data.notice_type, data.content, data.status, id],
        ).map_err(|e| AdminError::Database(format!("update notice: {e}")))?;
        if changed == 0 {
            return Err(AdminError::NotFound(format!("notice {id}")));
        }
        self.get_notice(id)
    }

    pub fn delete_notice(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE system_notices SET deleted=1, update_time=datetime('now') WHERE id=?1",
            params![id],
        ).map_err(|e| AdminError::Database(format!("delete notice: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_db;

    #[test]
    fn test_notice_crud() {
        let db = memory_db();
        let n = db.create_notice(&NoticeData {
            title: "Maintenance window".into(),
            content: "Saturday 02:00 UTC".into(),
            ..Default::default()
        }).unwrap();
        assert_eq!(n.notice_type, 1);

        let (list, total) = db.page_notices(1, 10).unwrap();
        assert_eq!(total, 1);
        assert_eq!(list[0].title, "Maintenance window");

        db.delete_notice(&n.id).unwrap();
        assert!(db.get_notice(&n.id).is_err());
    }
}

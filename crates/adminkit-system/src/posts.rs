//! Job posts.

use crate::db::{SystemDb, new_id, page_bounds};
use adminkit_core::error::{AdminError, Result};
use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub code: String,
    pub name: String,
    pub sort: i64,
    pub status: i64,
    pub remark: Option<String>,
    pub create_time: String,
    pub update_time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostData {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub sort: i64,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub remark: Option<String>,
}

const POST_COLS: &str = "id,code,name,sort,status,remark,create_time,update_time";

fn post_from_row(row: &Row) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        sort: row.get(3)?,
        status: row.get(4)?,
        remark: row.get(5)?,
        create_time: row.get(6)?,
        update_time: row.get(7)?,
    })
}

impl SystemDb {
    pub fn create_post(&self, data: &PostData) -> Result<Post> {
        let id = new_id();
        self.conn().execute(
            "INSERT INTO system_posts (id,code,name,sort,status,remark) VALUES (?1,?2,?3,?4,?5,?6)",
            params![id, data.code, data.name, data.sort, data.status, data.remark],
        ).map_err(|e| AdminError::Database(format!("insert post: {e}")))?;
        self.get_post(&id)
    }

    pub fn get_post(&self, id: &str) -> Result<Post> {
        self.conn().query_row(
            &format!("SELECT {POST_COLS} FROM system_posts WHERE id=?1 AND deleted=0"),
            params![id],
            post_from_row,
        ).map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AdminError::NotFound(format!("post {id}")),
            other => AdminError::Database(format!("get post: {other}")),
        })
    }

    pub fn page_posts(&self, page: u32, page_size: u32) -> Result<(Vec<Post>, i64)> {
        let (limit, offset) = page_bounds(page, page_size);
        let conn = self.conn();

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM system_posts WHERE deleted=0", [], |r| r.get(0),
        ).map_err(|e| AdminError::Database(format!("count posts: {e}")))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {POST_COLS} FROM system_posts WHERE deleted=0 ORDER BY sort, create_time LIMIT ?1 OFFSET ?2"
        )).map_err(|e| AdminError::Database(format!("prepare: {e}")))?;
        let posts = stmt.query_map(params![limit, offset], post_from_row)
            .map_err(|e| AdminError::Database(format!("query posts: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok((posts, total))
    }

    pub fn update_post(&self, id: &str, data: &PostData) -> Result<Post> {
        let changed = self.conn().execute(
            "UPDATE system_posts SET code=?1, name=?2, sort=?3, status=?4, remark=?5,
             update_time=datetime('now') WHERE id=?6 AND deleted=0",
            params![data.code, data.name, data.sort, data.status, data.remark, id],
        ).map_err(|e| AdminError::Database(format!("update post: {e}")))?;
        if changed == 0 {
            return Err(AdminError::NotFound(format!("post {id}")));
        }
        self.get_post(id)
    }

    pub fn delete_post(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE system_posts SET deleted=1, update_time=datetime('now') WHERE id=?1",
            params![id],
        ).map_err(|e| AdminError::Database(format!("delete post: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_db;

    #[test]
    fn test_post_crud() {
        let db = memory_db();
        let p = db.create_post(&PostData { code: "dev".into(), name: "Developer".into(), ..Default::default() }).unwrap();
        assert_eq!(p.code, "dev");

        let (list, total) = db.page_posts(1, 10).unwrap();
        assert_eq!(total, 1);
        assert_eq!(list[0].name, "Developer");

        db.delete_post(&p.id).unwrap();
        assert!(db.get_post(&p.id).is_err());
    }
}

//! Dictionaries — shared enumerations (status labels, sexes, …) that the
//! frontend renders from data instead of hardcoding.

use crate::db::{SystemDb, new_id, page_bounds};
use adminkit_core::error::{AdminError, Result};
use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictType {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub dict_type: String,
    pub status: i64,
    pub remark: Option<String>,
    pub create_time: String,
    pub update_time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictTypeData {
    pub name: String,
    #[serde(rename = "type")]
    pub dict_type: String,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictData {
    pub id: String,
    pub sort: i64,
    pub label: String,
    pub value: String,
    pub dict_type: String,
    pub status: i64,
    pub color_type: Option<String>,
    pub css_class: Option<String>,
    pub remark: Option<String>,
    pub create_time: String,
    pub update_time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictDataData {
    #[serde(default)]
    pub sort: i64,
    pub label: String,
    pub value: String,
    pub dict_type: String,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub color_type: Option<String>,
    #[serde(default)]
    pub css_class: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
}

const TYPE_COLS: &str = "id,name,type,status,remark,create_time,update_time";
const DATA_COLS: &str = "id,sort,label,value,dict_type,status,color_type,css_class,remark,create_time,update_time";

fn type_from_row(row: &Row) -> rusqlite::Result<DictType> {
    Ok(DictType {
        id: row.get(0)?,
        name: row.get(1)?,
        dict_type: row.get(2)?,
        status: row.get(3)?,
        remark: row.get(4)?,
        create_time: row.get(5)?,
        update_time: row.get(6)?,
    })
}

fn data_from_row(row: &Row) -> rusqlite::Result<DictData> {
    Ok(DictData {
        id: row.get(0)?,
        sort: row.get(1)?,
        label: row.get(2)?,
        value: row.get(3)?,
        dict_type: row.get(4)?,
        status: row.get(5)?,
        color_type: row.get(6)?,
        css_class: row.get(7)?,
        remark: row.get(8)?,
        create_time: row.get(9)?,
        update_time: row.get(10)?,
    })
}

impl SystemDb {
    // ── Dict types ────────────────────────────────────

    pub fn create_dict_type(&self, data: &DictTypeData) -> Result<DictType> {
        let id = new_id();
        self.conn().execute(
            "INSERT INTO system_dict_types (id,name,type,status,remark) VALUES (?1,?2,?3,?4,?5)",
            params![id, data.name, data.dict_type, data.status, data.remark],
        ).map_err(|e| AdminError::Database(format!("insert dict type: {e}")))?;
        self.get_dict_type(&id)
    }

    pub fn get_dict_type(&self, id: &str) -> Result<DictType> {
        self.conn().query_row(
            &format!("SELECT {TYPE_COLS} FROM system_dict_types WHERE id=?1 AND deleted=0"),
            params![id],
            type_from_row,
        ).map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AdminError::NotFound(format!("dict type {id}")),
            other => AdminError::Database(format!("get dict type: {other}")),
        })
    }

    pub fn page_dict_types(&self, page: u32, page_size: u32) -> Result<(Vec<DictType>, i64)> {
        let (limit, offset) = page_bounds(page, page_size);
        let conn = self.conn();

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM system_dict_types WHERE deleted=0", [], |r| r.get(0),
        ).map_err(|e| AdminError::Database(format!("count dict types: {e}")))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {TYPE_COLS} FROM system_dict_types WHERE deleted=0 ORDER BY create_time LIMIT ?1 OFFSET ?2"
        )).map_err(|e| AdminError::Database(format!("prepare: {e}")))?;
        let types = stmt.query_map(params![limit, offset], type_from_row)
            .map_err(|e| AdminError::Database(format!("query dict types: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok((types, total))
    }

    pub fn update_dict_type(&self, id: &str, data: &DictTypeData) -> Result<DictType> {
        let changed = self.conn().execute(
            "UPDATE system_dict_types SET name=?1, type=?2, status=?3, remark=?4,
             update_time=datetime('now') WHERE id=?5 AND deleted=0",
            params![data.name, data.dict_type, data.status, data.remark, id],
        ).map_err(|e| AdminError::Database(format!("update dict type: {e}")))?;
        if changed == 0 {
            return Err(AdminError::NotFound(format!("dict type {id}")));
        }
        self.get_dict_type(id)
    }

    pub fn delete_dict_type(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE system_dict_types SET deleted=1, update_time=datetime('now') WHERE id=?1",
            params![id],
        ).map_err(|e| AdminError::Database(format!("delete dict type: {e}")))?;
        Ok(())
    }

    // ── Dict data ────────────────────────────────────

    pub fn create_dict_data(&self, data: &DictDataData) -> Result<DictData> {
        let id = new_id();
        self.conn().execute(
            "INSERT INTO system_dict_data (id,sort,label,value,dict_type,status,color_type,css_class,remark)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
            params![
                id, data.sort, data.label, data.value, data.dict_type, data.status,
                data.color_type, data.css_class, data.remark
            ],
        ).map_err(|e| AdminError::Database(format!("insert dict data: {e}")))?;
        self.get_dict_data(&id)
    }

    pub fn get_dict_data(&self, id: &str) -> Result<DictData> {
        self.conn().query_row(
            &format!("SELECT {DATA_COLS} FROM system_dict_data WHERE id=?1 AND deleted=0"),
            params![id],
            data_from_row,
        ).map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AdminError::NotFound(format!("dict data {id}")),
            other => AdminError::Database(format!("get dict data: {other}")),
        })
    }

    /// Sort-ordered entries of one dictionary.
    pub fn list_dict_data(&self, dict_type: &str) -> Result<Vec<DictData>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {DATA_COLS} FROM system_dict_data WHERE dict_type=?1 AND deleted=0 ORDER BY sort"
        )).map_err(|e| AdminError::Database(format!("prepare: {e}")))?;
        let entries = stmt.query_map(params![dict_type], data_from_row)
            .map_err(|e| AdminError::Database(format!("query dict data: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }

    pub fn update_dict_data(&self, id: &str, data: &DictDataData) -> Result<DictData> {
        let changed = self.conn().execute(
            "UPDATE system_dict_data SET sort=?1, label=?2, value=?3, dict_type=?4, status=?5,
             color_type=?6, css_class=?7, remark=?8, update_time=datetime('now') WHERE id=?9 AND deleted=0",
            params![
                data.sort, data.label, data.value, data.dict_type, data.status,
                data.color_type, data.css_class, data.remark, id
            ],
        ).map_err(|e| AdminError::Database(format!("update dict data: {e}")))?;
        if changed == 0 {
            return Err(AdminError::NotFound(format!("dict data {id}")));
        }
        self.get_dict_data(id)
    }

    pub fn delete_dict_data(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE system_dict_data SET deleted=1, update_time=datetime('now') WHERE id=?1",
            params![id],
        ).map_err(|e| AdminError::Database(format!("delete dict data: {e}")))?;
        Ok(())
    }
}

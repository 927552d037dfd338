//! Runtime configuration parameters, keyed for programmatic lookup.

use crate::db::{SystemDb, new_id, page_bounds};
use adminkit_core::error::{AdminError, Result};
use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigItem {
    pub id: String,
    pub category: String,
    pub name: String,
    pub config_key: String,
    pub value: String,
    /// 0 system built-in, 1 user-defined.
    #[serde(rename = "type")]
    pub config_type: i64,
    pub visible: bool,
    pub remark: Option<String>,
    pub create_time: String,
    pub update_time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigItemData {
    pub category: String,
    pub name: String,
    pub config_key: String,
    pub value: String,
    #[serde(default, rename = "type")]
    pub config_type: i64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub remark: Option<String>,
}

fn default_visible() -> bool { true }

const CONFIG_COLS: &str = "id,category,name,config_key,value,type,visible,remark,create_time,update_time";

fn config_from_row(row: &Row) -> rusqlite::Result<ConfigItem> {
    Ok(ConfigItem {
        id: row.get(0)?,
        category: row.get(1)?,
        name: row.get(2)?,
        config_key: row.get(3)?,
        value: row.get(4)?,
        config_type: row.get(5)?,
        visible: row.get::<_, i64>(6)? != 0,
        remark: row.get(7)?,
        create_time: row.get(8)?,
        update_time: row.get(9)?,
    })
}

impl SystemDb {
    pub fn create_config(&self, data: &ConfigItemData) -> Result<ConfigItem> {
        let id = new_id();
        self.conn().execute(
            "INSERT INTO system_configs (id,category,name,config_key,value,type,visible,remark)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            params![
                id, data.category, data.name, data.config_key, data.value,
                data.config_type, data.visible as i64, data.remark
            ],
        ).map_err(|e| AdminError::Database(format!("insert config: {e}")))?;
        self.get_config(&id)
    }

    pub fn get_config(&self, id: &str) -> Result<ConfigItem> {
        self.conn().query_row(
            &format!("SELECT {CONFIG_COLS} FROM system_configs WHERE id=?1 AND deleted=0"),
            params![id],
            config_from_row,
        ).map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AdminError::NotFound(format!("config {id}")),
            other => AdminError::Database(format!("get config: {other}")),
        })
    }

    /// Programmatic lookup by key.
    pub fn get_config_by_key(&self, key: &str) -> Result<Option<ConfigItem>> {
        let result = self.conn().query_row(
            &format!("SELECT {CONFIG_COLS} FROM system_configs WHERE config_key=?1 AND deleted=0"),
            params![key],
            config_from_row,
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AdminError::Database(format!("get config by key: {e}"))),
        }
    }

    pub fn page_configs(&self, page: u32, page_size: u32) -> Result<(Vec<ConfigItem>, i64)> {
        let (limit, offset) = page_bounds(page, page_size);
        let conn = self.conn();

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM system_configs WHERE deleted=0", [], |r| r.get(0),
        ).map_err(|e| AdminError::Database(format!("count configs: {e}")))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {CONFIG_COLS} FROM system_configs WHERE deleted=0 ORDER BY category, config_key LIMIT ?1 OFFSET ?2"
        )).map_err(|e| AdminError::Database(format!("prepare: {e}")))?;
        let configs = stmt.query_map(params![limit, offset], config_from_row)
            .map_err(|e| AdminError::Database(format!("query configs: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok((configs, total))
    }

    pub fn update_config(&self, id: &str, data: &ConfigItemData) -> Result<ConfigItem> {
        let changed = self.conn().execute(
            "UPDATE system_configs SET category=?1, name=?2, config_key=?3, value=?4, type=?5,
             visible=?6, remark=?7, update_time=datetime('now') WHERE id=?8 AND deleted=0",
            params![
                data.category, data.name, data.config_key, data.value,
                data.config_type, data.visible as i64, data.remark, id
            ],
        ).map_err(|e| AdminError::Database(format!("update config: {e}")))?;
        if changed == 0 {
            return Err(AdminError::NotFound(format!("config {id}")));
        }
        self.get_config(id)
    }

    pub fn delete_config(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE system_configs SET deleted=1, update_time=datetime('now') WHERE id=?1",
            params![id],
        ).map_err(|e| AdminError::Database(format!("delete config: {e}")))?;
        Ok(())
    }
}

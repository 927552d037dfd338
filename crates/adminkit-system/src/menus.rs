//! Menus — the navigation tree that doubles as the permission catalog.

use crate::db::{SystemDb, new_id, page_bounds};
use adminkit_core::error::{AdminError, Result};
use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};

/// Id of the implicit tree root.
pub const ROOT_PARENT: &str = "0";

/// Menu record. `menu_type`: 1 directory, 2 menu, 3 button.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    pub id: String,
    pub name: String,
    pub permission: String,
    #[serde(rename = "type")]
    pub menu_type: i64,
    pub sort: i64,
    pub parent_id: String,
    pub path: String,
    pub icon: String,
    pub component: Option<String>,
    pub component_name: Option<String>,
    pub status: i64,
    pub visible: bool,
    pub keep_alive: bool,
    pub create_time: String,
    pub update_time: String,
}

/// Fields accepted when creating or updating a menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuData {
    pub name: String,
    #[serde(default)]
    pub permission: String,
    #[serde(default = "default_menu_type", rename = "type")]
    pub menu_type: i64,
    #[serde(default)]
    pub sort: i64,
    #[serde(default = "default_parent")]
    pub parent_id: String,
    #[serde(default)]
    pub path: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub component_name: Option<String>,
    #[serde(default)]
    pub status: i64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub keep_alive: bool,
}

fn default_menu_type() -> i64 { 2 }
fn default_parent() -> String { ROOT_PARENT.into() }
fn default_icon() -> String { "#".into() }
fn default_true() -> bool { true }

impl Default for MenuData {
    fn default() -> Self {
        Self {
            name: String::new(),
            permission: String::new(),
            menu_type: default_menu_type(),
            sort: 0,
            parent_id: default_parent(),
            path: String::new(),
            icon: default_icon(),
            component: None,
            component_name: None,
            status: 0,
            visible: true,
            keep_alive: true,
        }
    }
}

/// A menu with its children, for tree responses.
#[derive(Debug, Clone, Serialize)]
pub struct MenuTree {
    #[serde(flatten)]
    pub menu: Menu,
    pub children: Vec<MenuTree>,
}

/// Assemble a tree from a flat, sort-ordered list.
pub fn build_menu_tree(menus: &[Menu], parent_id: &str) -> Vec<MenuTree> {
    menus
        .iter()
        .filter(|m| m.parent_id == parent_id)
        .map(|m| MenuTree { menu: m.clone(), children: build_menu_tree(menus, &m.id) })
        .collect()
}

const MENU_COLS: &str = "id,name,permission,type,sort,parent_id,path,icon,component,component_name,status,visible,keep_alive,create_time,update_time";

fn menu_from_row(row: &Row) -> rusqlite::Result<Menu> {
    Ok(Menu {
        id: row.get(0)?,
        name: row.get(1)?,
        permission: row.get(2)?,
        menu_type: row.get(3)?,
        sort: row.get(4)?,
        parent_id: row.get(5)?,
        path: row.get(6)?,
        icon: row.get(7)?,
        component: row.get(8)?,
        component_name: row.get(9)?,
        status: row.get(10)?,
        visible: row.get::<_, i64>(11)? != 0,
        keep_alive: row.get::<_, i64>(12)? != 0,
        create_time: row.get(13)?,
        update_time: row.get(14)?,
    })
}

impl SystemDb {
    pub fn create_menu(&self, data: &MenuData) -> Result<Menu> {
        let id = new_id();
        self.conn().execute(
            "INSERT INTO system_menus (id,name,permission,type,sort,parent_id,path,icon,component,component_name,status,visible,keep_alive)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13)",
            params![
                id, data.name, data.permission, data.menu_type, data.sort, data.parent_id,
                data.path, data.icon, data.component, data.component_name, data.status,
                data.visible as i64, data.keep_alive as i64
            ],
        ).map_err(|e| AdminError::Database(format!("insert menu: {e}")))?;
        self.get_menu(&id)
    }

    pub fn get_menu(&self, id: &str) -> Result<Menu> {
        self.conn().query_row(
            &format!("SELECT {MENU_COLS} FROM system_menus WHERE id=?1 AND deleted=0"),
            params![id],
            menu_from_row,
        ).map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AdminError::NotFound(format!("menu {id}")),
            other => AdminError::Database(format!("get menu: {other}")),
        })
    }

    /// Find a menu by its permission string.
    pub fn find_menu_by_permission(&self, permission: &str) -> Result<Option<Menu>> {
        let result = self.conn().query_row(
            &format!("SELECT {MENU_COLS} FROM system_menus WHERE permission=?1 AND deleted=0"),
            params![permission],
            menu_from_row,
        );
        match result {
            Ok(m) => Ok(Some(m)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AdminError::Database(format!("find menu: {e}"))),
        }
    }

    /// Full sort-ordered menu list (the tree is assembled in memory).
    pub fn list_menus(&self) -> Result<Vec<Menu>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {MENU_COLS} FROM system_menus WHERE deleted=0 ORDER BY sort, create_time"
        )).map_err(|e| AdminError::Database(format!("prepare: {e}")))?;
        let menus = stmt.query_map([], menu_from_row)
            .map_err(|e| AdminError::Database(format!("query menus: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(menus)
    }

    pub fn page_menus(&self, page: u32, page_size: u32) -> Result<(Vec<Menu>, i64)> {
        let (limit, offset) = page_bounds(page, page_size);
        let conn = self.conn();

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM system_menus WHERE deleted=0", [], |r| r.get(0),
        ).map_err(|e| AdminError::Database(format!("count menus: {e}")))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {MENU_COLS} FROM system_menus WHERE deleted=0 ORDER BY sort, create_time LIMIT ?1 OFFSET ?2"
        )).map_err(|e| AdminError::Database(format!("prepare: {e}")))?;
        let menus = stmt.query_map(params![limit, offset], menu_from_row)
            .map_err(|e| AdminError::Database(format!("query menus: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok((menus, total))
    }

    pub fn update_menu(&self, id: &str, data: &MenuData) -> Result<Menu> {
        let changed = self.conn().execute(
            "UPDATE system_menus SET name=?1, permission=?2, type=?3, sort=?4, parent_id=?5, path=?6,
             icon=?7, component=?8, component_name=?9, status=?10, visible=?11, keep_alive=?12,
             update_time=datetime('now') WHERE id=?13 AND deleted=0",
            params![
                data.name, data.permission, data.menu_type, data.sort, data.parent_id, data.path,
                data.icon, data.component, data.component_name, data.status,
                data.visible as i64, data.keep_alive as i64, id
            ],
        ).map_err(|e| AdminError::Database(format!("update menu: {e}")))?;
        if changed == 0 {
            return Err(AdminError::NotFound(format!("menu {id}")));
        }
        self.get_menu(id)
    }

    pub fn delete_menu(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE system_menus SET deleted=1, update_time=datetime('now') WHERE id=?1",
            params![id],
        ).map_err(|e| AdminError::Database(format!("delete menu: {e}")))?;
        Ok(())
    }
}

//! Tenants.

use crate::db::{SystemDb, new_id, page_bounds};
use adminkit_core::error::{AdminError, Result};
use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};

/// Tenant record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub contact_user_id: Option<String>,
    pub contact_name: Option<String>,
    pub contact_mobile: Option<String>,
    pub status: i64,
    pub package_id: Option<String>,
    pub expire_time: Option<String>,
    pub account_count: i64,
    pub create_time: String,
    pub update_time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantData {
    pub name: String,
    #[serde(default)]
    pub contact_user_id: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_mobile: Option<String>,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub package_id: Option<String>,
    #[serde(default)]
    pub expire_time: Option<String>,
    #[serde(default)]
    pub account_count: i64,
}

const TENANT_COLS: &str = "id,name,contact_user_id,contact_name,contact_mobile,status,package_id,expire_time,account_count,create_time,update_time";

fn tenant_from_row(row: &Row) -> rusqlite::Result<Tenant> {
    Ok(Tenant {
        id: row.get(0)?,
        name: row.get(1)?,
        contact_user_id: row.get(2)?,
        contact_name: row.get(3)?,
        contact_mobile: row.get(4)?,
        status: row.get(5)?,
        package_id: row.get(6)?,
        expire_time: row.get(7)?,
        account_count: row.get(8)?,
        create_time: row.get(9)?,
        update_time: row.get(10)?,
    })
}

impl SystemDb {
    pub fn create_tenant(&self, data: &TenantData) -> Result<Tenant> {
        let id = new_id();
        self.conn().execute(
            "INSERT INTO system_tenants (id,name,contact_user_id,contact_name,contact_mobile,status,package_id,expire_time,account_count)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
            params![
                id, data.name, data.contact_user_id, data.contact_name, data.contact_mobile,
                data.status, data.package_id, data.expire_time, data.account_count
            ],
        ).map_err(|e| AdminError::Database(format!("insert tenant: {e}")))?;
        self.get_tenant(&id)
    }

    pub fn get_tenant(&self, id: &str) -> Result<Tenant> {
        self.conn().query_row(
            &format!("SELECT {TENANT_COLS} FROM system_tenants WHERE id=?1 AND deleted=0"),
            params![id],
            tenant_from_row,
        ).map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AdminError::NotFound(format!("tenant {id}")),
            other => AdminError::Database(format!("get tenant: {other}")),
        })
    }

    pub fn page_tenants(&self, page: u32, page_size: u32) -> Result<(Vec<Tenant>, i64)> {
        let (limit, offset) = page_bounds(page, page_size);
        let conn = self.conn();

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM system_tenants WHERE deleted=0", [], |r| r.get(0),
        ).map_err(|e| AdminError::Database(format!("count tenants: {e}")))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {TENANT_COLS} FROM system_tenants WHERE deleted=0 ORDER BY create_time DESC LIMIT ?1 OFFSET ?2"
        )).map_err(|e| AdminError::Database(format!("prepare: {e}")))?;
        let tenants = stmt.query_map(params![limit, offset], tenant_from_row)
            .map_err(|e| AdminError::Database(format!("query tenants: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok((tenants, total))
    }

    pub fn update_tenant(&self, id: &str, data: &TenantData) -> Result<Tenant> {
        let changed = self.conn().execute(
            "UPDATE system_tenants SET name=?1, contact_user_id=?2, contact_name=?3, contact_mobile=?4,
             status=?5, package_id=?6, expire_time=?7, account_count=?8, update_time=datetime('now')
             WHERE id=?9 AND deleted=0",
            params![
                data.name, data.contact_user_id, data.contact_name, data.contact_mobile,
                data.status, data.package_id, data.expire_time, data.account_count, id
            ],
        ).map_err(|e| AdminError::Database(format!("update tenant: {e}")))?;
        if changed == 0 {
            return Err(AdminError::NotFound(format!("tenant {id}")));
        }
        self.get_tenant(id)
    }

    pub fn delete_tenant(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE system_tenants SET deleted=1, update_time=datetime('now') WHERE id=?1",
            params![id],
        ).map_err(|e| AdminError::Database(format!("delete tenant: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_db;

    #[test]
    fn test_tenant_crud() {
        let db = memory_db();
        let t = db.create_tenant(&TenantData {
            name: "Acme".into(),
            contact_name: Some("Jo".into()),
            account_count: 10,
            ..Default::default()
        }).unwrap();
        assert_eq!(t.name, "Acme");
        assert_eq!(t.account_count, 10);

        let (list, total) = db.page_tenants(1, 10).unwrap();
        assert_eq!(total, 1);
        assert_eq!(list[0].contact_name.as_deref(), Some("Jo"));

        db.delete_tenant(&t.id).unwrap();
        assert!(db.get_tenant(&t.id).is_err());
    }
}

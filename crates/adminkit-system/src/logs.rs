//! Audit logs — login attempts and API operations.

use crate::db::{SystemDb, page_bounds};
use adminkit_core::error::{AdminError, Result};
use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};

/// Login outcome codes for [`LoginLog::result`].
pub mod login_result {
    pub const SUCCESS: i64 = 0;
    pub const BAD_CREDENTIALS: i64 = 10;
    pub const USER_DISABLED: i64 = 20;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginLog {
    pub id: i64,
    pub log_type: i64,
    pub trace_id: Option<String>,
    pub username: String,
    pub result: i64,
    pub user_ip: Option<String>,
    pub user_agent: Option<String>,
    pub create_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperateLog {
    pub id: i64,
    pub trace_id: Option<String>,
    pub user_id: Option<String>,
    pub module: Option<String>,
    pub name: Option<String>,
    pub request_method: Option<String>,
    pub request_url: Option<String>,
    pub user_ip: Option<String>,
    pub duration_ms: i64,
    pub result_code: i64,
    pub result_msg: Option<String>,
    pub create_time: String,
}

/// One operation-log row, assembled by the request middleware.
#[derive(Debug, Clone, Default)]
pub struct OperateLogEntry {
    pub trace_id: String,
    pub user_id: Option<String>,
    pub module: String,
    pub name: String,
    pub request_method: String,
    pub request_url: String,
    pub user_ip: Option<String>,
    pub duration_ms: i64,
    pub result_code: i64,
    pub result_msg: Option<String>,
}

fn login_from_row(row: &Row) -> rusqlite::Result<LoginLog> {
    Ok(LoginLog {
        id: row.get(0)?,
        log_type: row.get(1)?,
        trace_id: row.get(2)?,
        username: row.get(3)?,
        result: row.get(4)?,
        user_ip: row.get(5)?,
        user_agent: row.get(6)?,
        create_time: row.get(7)?,
    })
}

fn operate_from_row(row: &Row) -> rusqlite::Result<OperateLog> {
    Ok(OperateLog {
        id: row.get(0)?,
        trace_id: row.get(1)?,
        user_id: row.get(2)?,
        module: row.get(3)?,
        name: row.get(4)?,
        request_method: row.get(5)?,
        request_url: row.get(6)?,
        user_ip: row.get(7)?,
        duration_ms: row.get(8)?,
        result_code: row.get(9)?,
        result_msg: row.get(10)?,
        create_time: row.get(11)?,
    })
}

impl SystemDb {
    /// Record a login attempt.
    pub fn record_login(
        &self,
        username: &str,
        result: i64,
        user_ip: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<()> {
        let trace_id = uuid::Uuid::new_v4().to_string();
        self.conn().execute(
            "INSERT INTO system_login_logs (trace_id, username, result, user_ip, user_agent)
             VALUES (?1,?2,?3,?4,?5)",
            params![trace_id, username, result, user_ip, user_agent],
        ).map_err(|e| AdminError::Database(format!("record login: {e}")))?;
        Ok(())
    }

    /// Newest-first page of login attempts.
    pub fn page_login_logs(&self, page: u32, page_size: u32) -> Result<(Vec<LoginLog>, i64)> {
        let (limit, offset) = page_bounds(page, page_size);
        let conn = self.conn();

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM system_login_logs", [], |r| r.get(0),
        ).map_err(|e| AdminError::Database(format!("count login logs: {e}")))?;

        let mut stmt = conn.prepare(
            "SELECT id,log_type,trace_id,username,result,user_ip,user_agent,create_time
             FROM system_login_logs ORDER BY id DESC LIMIT ?1 OFFSET ?2",
        ).map_err(|e| AdminError::Database(format!("prepare: {e}")))?;
        let logs = stmt.query_map(params![limit, offset], login_from_row)
            .map_err(|e| AdminError::Database(format!("query login logs: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok((logs, total))
    }

    /// Record one API operation.
    pub fn record_operation(&self, entry: &OperateLogEntry) -> Result<()> {
        self.conn().execute(
            "INSERT INTO system_operate_logs
             (trace_id, user_id, module, name, request_method, request_url, user_ip, duration_ms, result_code, result_msg)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
            params![
                entry.trace_id, entry.user_id, entry.module, entry.name, entry.request_method,
                entry.request_url, entry.user_ip, entry.duration_ms, entry.result_code, entry.result_msg
            ],
        ).map_err(|e| AdminError::Database(format!("record operation: {e}")))?;
        Ok(())
    }

    /// Newest-first page of API operations.
    pub fn page_operate_logs(&self, page: u32, page_size: u32) -> Result<(Vec<OperateLog>, i64)> {
        let (limit, offset) = page_bounds(page, page_size);
        let conn = self.conn();

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM system_operate_logs", [], |r| r.get(0),
        ).map_err(|e| AdminError::Database(format!("count operate logs: {e}")))?;

        let mut stmt = conn.prepare(
            "SELECT id,trace_id,user_id,module,name,request_method,request_url,user_ip,duration_ms,result_code,result_msg,create_time
             FROM system_operate_logs ORDER BY id DESC LIMIT ?1 OFFSET ?2",
        ).map_err(|e| AdminError::Database(format!("prepare: {e}")))?;
        let logs = stmt.query_map(params![limit, offset], operate_from_row)
            .map_err(|e| AdminError::Database(format!("query operate logs: {e}")))?
            .filter_map(|r| r.ok())
            .collect();
        Ok((logs, total))
    }
}

//! API result envelopes.
//!
//! Every HTTP handler responds with [`ApiResult`]; paged listings wrap a
//! [`PageResult`] inside it. `code` 0 means success, anything else is one of
//! the [`error_code`] constants.

use serde::{Deserialize, Serialize};

/// Uniform response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResult<T> {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: i64,
}

impl<T> ApiResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: error_code::SUCCESS,
            message: "Success".into(),
            data: Some(data),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn err(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == error_code::SUCCESS
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub list: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> PageResult<T> {
    pub fn new(list: Vec<T>, total: i64, page: u32, page_size: u32) -> Self {
        Self { list, total, page, page_size }
    }
}

/// Business error codes shared with API clients.
pub mod error_code {
    pub const SUCCESS: i64 = 0;
    pub const BAD_REQUEST: i64 = 400;
    pub const UNAUTHORIZED: i64 = 401;
    pub const FORBIDDEN: i64 = 403;
    pub const NOT_FOUND: i64 = 404;
    pub const INTERNAL_ERROR: i64 = 500;
    pub const USER_NOT_EXISTS: i64 = 1001;
    pub const USER_DISABLED: i64 = 1002;
    pub const USER_PASSWORD_FAILED: i64 = 1003;
}

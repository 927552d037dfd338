//! # AdminKit Core
//!
//! Shared foundation for the AdminKit workspace: the error type, the TOML
//! configuration file, and the API result envelopes every handler returns.

pub mod config;
pub mod error;
pub mod result;

pub use config::AdminConfig;
pub use error::{AdminError, Result};
pub use result::{ApiResult, PageResult};

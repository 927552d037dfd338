//! Configuration file handling.
//!
//! AdminKit reads a single TOML file. Every section is optional and falls
//! back to defaults, so a missing file yields a fully usable configuration.
//! The path comes from `ADMINKIT_CONFIG` or the platform data directory.

use crate::error::{AdminError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub modules: ModulesConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Token issuing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret. Override in production.
    #[serde(default = "default_secret")]
    pub secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: i64,
}

/// SQLite database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

/// Module loader settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulesConfig {
    /// Base directory scanned for module entry files.
    #[serde(default = "default_modules_dir")]
    pub dir: String,
    /// Manifest listing enabled module names.
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 8080 }
fn default_secret() -> String { "abcdefghijklmnopqrstuvwxyz123456789".into() }
fn default_token_ttl() -> i64 { 24 }
fn default_modules_dir() -> String { "modules".into() }
fn default_manifest() -> String { "modules.json".into() }

fn default_db_path() -> String {
    data_dir().join("adminkit.db").display().to_string()
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("adminkit"))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { secret: default_secret(), token_ttl_hours: default_token_ttl() }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: default_db_path() }
    }
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self { dir: default_modules_dir(), manifest: default_manifest() }
    }
}

impl AdminConfig {
    /// Default config file location.
    pub fn default_path() -> PathBuf {
        data_dir().join("adminkit.toml")
    }

    /// Load from `ADMINKIT_CONFIG`, or the default path. A missing file is
    /// not an error — defaults apply.
    pub fn load() -> Result<Self> {
        let path = std::env::var("ADMINKIT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("no config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load and parse a specific config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AdminError::Config(format!("read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| AdminError::Config(format!("parse {}: {e}", path.display())))
    }

    /// Signing secret left at the built-in default?
    pub fn is_default_secret(&self) -> bool {
        self.auth.secret == default_secret()
    }
}

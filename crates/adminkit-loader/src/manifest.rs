//! Module manifest reading.
//!
//! The manifest is a JSON object with a single `modules` field naming the
//! enabled module directories, in activation order.

use crate::error::LoaderError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parsed `modules.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleManifest {
    pub modules: Vec<String>,
}

/// Read the manifest at `path`.
///
/// A missing file yields `Ok(None)` — module loading is a best-effort
/// enhancement, not a startup dependency. A file that exists but cannot be
/// parsed (or lacks the `modules` field) is a [`LoaderError::ManifestParse`].
pub async fn read_manifest(path: &Path) -> Result<Option<ModuleManifest>, LoaderError> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Ok(None);
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LoaderError::ManifestParse(format!("read {}: {e}", path.display())))?;

    let manifest: ModuleManifest = serde_json::from_str(&content)
        .map_err(|e| LoaderError::ManifestParse(format!("parse {}: {e}", path.display())))?;

    Ok(Some(manifest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_tmp(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_missing_manifest_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_manifest(&dir.path().join("modules.json")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_reads_module_names_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tmp(&dir, "modules.json", r#"{"modules": ["notice", "dict", "monitor"]}"#);
        let manifest = read_manifest(&path).await.unwrap().unwrap();
        assert_eq!(manifest.modules, vec!["notice", "dict", "monitor"]);
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tmp(&dir, "modules.json", "{not json");
        let err = read_manifest(&path).await.unwrap_err();
        assert!(matches!(err, LoaderError::ManifestParse(_)));
    }

    #[tokio::test]
    async fn test_missing_modules_field_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tmp(&dir, "modules.json", r#"{"plugins": []}"#);
        let err = read_manifest(&path).await.unwrap_err();
        assert!(matches!(err, LoaderError::ManifestParse(_)));
    }
}

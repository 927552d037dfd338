//! Module entry files.
//!
//! An entry file is the TOML counterpart of a module's export table: a
//! `[module]` header plus an ordered `[[export]]` array. Declaration order
//! is meaningful — when no export is named `default`, the first one wins.

use serde::Deserialize;

/// Parsed entry file (`index.toml` or `<name>.module.toml`).
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleEntry {
    pub module: ModuleMeta,
    #[serde(default, rename = "export")]
    pub exports: Vec<ExportSpec>,
}

/// `[module]` header.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleMeta {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub description: Option<String>,
}

/// One `[[export]]` entry: a named reference to a cataloged component.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportSpec {
    pub name: String,
    /// Component key looked up in the [`crate::ComponentCatalog`].
    pub component: String,
    /// Component-specific settings, passed through to the factory.
    #[serde(default)]
    pub config: toml::Table,
}

fn default_version() -> String {
    "0.0.0".into()
}

impl ModuleEntry {
    /// Parse entry-file text.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// The export to register: `default` if declared, else the first one.
    pub fn selected_export(&self) -> Option<&ExportSpec> {
        self.exports
            .iter()
            .find(|e| e.name == "default")
            .or_else(|| self.exports.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = r#"
        [module]
        name = "notice"
        version = "0.1.0"
        description = "announcement endpoints"

        [[export]]
        name = "default"
        component = "notice"
    "#;

    #[test]
    fn test_parse_entry() {
        let entry = ModuleEntry::parse(ENTRY).unwrap();
        assert_eq!(entry.module.name, "notice");
        assert_eq!(entry.module.version, "0.1.0");
        assert_eq!(entry.exports.len(), 1);
        assert_eq!(entry.selected_export().unwrap().component, "notice");
    }

    #[test]
    fn test_default_export_preferred() {
        let entry = ModuleEntry::parse(
            r#"
            [module]
            name = "m"

            [[export]]
            name = "extra"
            component = "a"

            [[export]]
            name = "default"
            component = "b"
            "#,
        )
        .unwrap();
        assert_eq!(entry.selected_export().unwrap().component, "b");
    }

    #[test]
    fn test_first_export_when_no_default() {
        let entry = ModuleEntry::parse(
            r#"
            [module]
            name = "m"

            [[export]]
            name = "first"
            component = "a"

            [[export]]
            name = "second"
            component = "b"
            "#,
        )
        .unwrap();
        assert_eq!(entry.selected_export().unwrap().component, "a");
    }

    #[test]
    fn test_no_exports() {
        let entry = ModuleEntry::parse("[module]\nname = \"empty\"").unwrap();
        assert!(entry.selected_export().is_none());
    }

    #[test]
    fn test_export_config_passthrough() {
        let entry = ModuleEntry::parse(
            r#"
            [module]
            name = "monitor"

            [[export]]
            name = "default"
            component = "monitor"
            config = { recent_limit = 50 }
            "#,
        )
        .unwrap();
        let export = entry.selected_export().unwrap();
        assert_eq!(export.config.get("recent_limit").and_then(|v| v.as_integer()), Some(50));
    }

    #[test]
    fn test_version_defaults() {
        let entry = ModuleEntry::parse("[module]\nname = \"m\"").unwrap();
        assert_eq!(entry.module.version, "0.0.0");
    }
}

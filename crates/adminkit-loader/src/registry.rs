//! Composition registry — the manifest → resolve → import pipeline.

use crate::catalog::ComponentCatalog;
use crate::entry::ModuleEntry;
use crate::error::LoaderError;
use crate::manifest::read_manifest;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A successfully loaded module, ready for registration.
#[derive(Debug, Clone)]
pub struct LoadedModule<T> {
    /// Name as declared in the manifest.
    pub name: String,
    /// Version from the entry file's `[module]` header.
    pub version: String,
    /// The composition unit produced by the component factory.
    pub unit: T,
}

/// Loads enabled modules and accumulates their composition units.
///
/// The registry holds no state between passes: every [`load_all`] re-reads
/// the manifest and re-attempts every module.
///
/// [`load_all`]: ModuleRegistry::load_all
pub struct ModuleRegistry<T> {
    manifest_path: PathBuf,
    modules_dir: PathBuf,
    catalog: ComponentCatalog<T>,
}

impl<T> ModuleRegistry<T> {
    pub fn new(
        manifest_path: impl Into<PathBuf>,
        modules_dir: impl Into<PathBuf>,
        catalog: ComponentCatalog<T>,
    ) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            modules_dir: modules_dir.into(),
            catalog,
        }
    }

    /// Run the full loading pass.
    ///
    /// Modules are processed strictly in manifest order, one at a time,
    /// because later modules may depend on earlier ones being registered
    /// first. Any per-module failure is logged and skipped; this method
    /// never fails, the worst outcome is an empty result.
    pub async fn load_all(&self) -> Vec<LoadedModule<T>> {
        let mut loaded = Vec::new();

        let names = match read_manifest(&self.manifest_path).await {
            Ok(Some(manifest)) => manifest.modules,
            Ok(None) => {
                info!("no {} found, skipping module loading", self.manifest_path.display());
                return loaded;
            }
            Err(e) => {
                warn!("failed to read module manifest: {e}");
                return loaded;
            }
        };

        for name in names {
            match self.load_one(&name).await {
                Ok(module) => {
                    info!(module = %name, version = %module.version, "module loaded");
                    loaded.push(module);
                }
                Err(e) => {
                    warn!(module = %name, "module skipped: {e}");
                }
            }
        }

        loaded
    }

    /// Names declared in the manifest, without resolving or importing them.
    pub async fn enabled_modules(&self) -> Vec<String> {
        match read_manifest(&self.manifest_path).await {
            Ok(Some(manifest)) => manifest.modules,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("failed to read module manifest: {e}");
                Vec::new()
            }
        }
    }

    /// Is `name` declared in the manifest? Declared, not successfully
    /// loaded: a module that would fail to import still counts.
    pub async fn is_enabled(&self, name: &str) -> bool {
        self.enabled_modules().await.iter().any(|m| m == name)
    }

    async fn load_one(&self, name: &str) -> Result<LoadedModule<T>, LoaderError> {
        let entry_path = self.resolve(name).await?;
        self.import(name, &entry_path).await
    }

    /// Locate a module's entry file. `index.toml` takes priority because it
    /// can aggregate multiple exports; `<name>.module.toml` is the direct
    /// definition fallback.
    async fn resolve(&self, name: &str) -> Result<PathBuf, LoaderError> {
        let module_dir = self.modules_dir.join(name);
        if !exists(&module_dir).await {
            return Err(LoaderError::ModuleNotFound(name.into()));
        }

        let index_path = module_dir.join("index.toml");
        if exists(&index_path).await {
            debug!(module = %name, "resolved via index entry");
            return Ok(index_path);
        }

        let module_path = module_dir.join(format!("{name}.module.toml"));
        if exists(&module_path).await {
            debug!(module = %name, "resolved via module entry");
            return Ok(module_path);
        }

        Err(LoaderError::EntryPointNotFound(name.into()))
    }

    /// Parse the entry file and instantiate its selected export.
    async fn import(&self, name: &str, entry_path: &Path) -> Result<LoadedModule<T>, LoaderError> {
        let text = tokio::fs::read_to_string(entry_path)
            .await
            .map_err(|e| LoaderError::import(name, format!("read entry file: {e}")))?;

        let entry = ModuleEntry::parse(&text)
            .map_err(|e| LoaderError::import(name, format!("parse entry file: {e}")))?;

        let export = entry
            .selected_export()
            .ok_or_else(|| LoaderError::EmptyModuleExport(name.into()))?;

        let unit = self
            .catalog
            .create(export)
            .map_err(|reason| LoaderError::import(name, reason))?;

        Ok(LoadedModule {
            name: name.into(),
            version: entry.module.version.clone(),
            unit,
        })
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Fixture: a workspace with a manifest and a modules directory, loading
    /// string units so the tests stay independent of any HTTP framework.
    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new(manifest: Option<&str>) -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::create_dir_all(dir.path().join("modules")).unwrap();
            if let Some(content) = manifest {
                fs::write(dir.path().join("modules.json"), content).unwrap();
            }
            Self { dir }
        }

        fn add_module(&self, name: &str, entry_file: &str, component: &str) {
            let module_dir = self.dir.path().join("modules").join(name);
            fs::create_dir_all(&module_dir).unwrap();
            fs::write(
                module_dir.join(entry_file),
                format!(
                    "[module]\nname = \"{name}\"\nversion = \"1.0.0\"\n\n\
                     [[export]]\nname = \"default\"\ncomponent = \"{component}\"\n"
                ),
            )
            .unwrap();
        }

        fn add_dir_only(&self, name: &str) {
            fs::create_dir_all(self.dir.path().join("modules").join(name)).unwrap();
        }

        fn registry(&self) -> ModuleRegistry<String> {
            let mut catalog = ComponentCatalog::new();
            catalog.register("echo", |export: &crate::ExportSpec| {
                Ok(format!("unit:{}", export.component))
            });
            catalog.register("broken", |_: &crate::ExportSpec| Err("factory exploded".into()));
            ModuleRegistry::new(
                self.dir.path().join("modules.json"),
                self.dir.path().join("modules"),
                catalog,
            )
        }
    }

    #[tokio::test]
    async fn test_loads_all_in_manifest_order() {
        let fx = Fixture::new(Some(r#"{"modules": ["a", "b", "c"]}"#));
        fx.add_module("a", "index.toml", "echo");
        fx.add_module("b", "index.toml", "echo");
        fx.add_module("c", "index.toml", "echo");

        let loaded = fx.registry().load_all().await;
        let names: Vec<_> = loaded.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(loaded[0].version, "1.0.0");
        assert_eq!(loaded[0].unit, "unit:echo");
    }

    #[tokio::test]
    async fn test_missing_manifest_loads_nothing() {
        let fx = Fixture::new(None);
        assert!(fx.registry().load_all().await.is_empty());
        assert!(fx.registry().enabled_modules().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_manifest_loads_nothing() {
        let fx = Fixture::new(Some("{broken"));
        assert!(fx.registry().load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_directory_skips_only_that_module() {
        let fx = Fixture::new(Some(r#"{"modules": ["a", "b", "c"]}"#));
        fx.add_module("a", "index.toml", "echo");
        // no directory for b
        fx.add_module("c", "index.toml", "echo");

        let loaded = fx.registry().load_all().await;
        let names: Vec<_> = loaded.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_index_entry_takes_priority() {
        let fx = Fixture::new(Some(r#"{"modules": ["dual"]}"#));
        fx.add_module("dual", "dual.module.toml", "broken");
        fx.add_module("dual", "index.toml", "echo");

        let loaded = fx.registry().load_all().await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].unit, "unit:echo");
    }

    #[tokio::test]
    async fn test_module_entry_fallback() {
        let fx = Fixture::new(Some(r#"{"modules": ["solo"]}"#));
        fx.add_module("solo", "solo.module.toml", "echo");

        let loaded = fx.registry().load_all().await;
        assert_eq!(loaded.len(), 1);
    }

    #[tokio::test]
    async fn test_directory_without_entry_file_is_skipped() {
        let fx = Fixture::new(Some(r#"{"modules": ["hollow", "ok"]}"#));
        fx.add_dir_only("hollow");
        fx.add_module("ok", "index.toml", "echo");

        let loaded = fx.registry().load_all().await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "ok");
    }

    #[tokio::test]
    async fn test_failing_import_does_not_block_later_modules() {
        let fx = Fixture::new(Some(r#"{"modules": ["bad", "good"]}"#));
        fx.add_module("bad", "index.toml", "broken");
        fx.add_module("good", "index.toml", "echo");

        let loaded = fx.registry().load_all().await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "good");
    }

    #[tokio::test]
    async fn test_unparseable_entry_is_skipped() {
        let fx = Fixture::new(Some(r#"{"modules": ["garbled", "ok"]}"#));
        let dir = fx.dir.path().join("modules/garbled");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.toml"), "[[[not toml").unwrap();
        fx.add_module("ok", "index.toml", "echo");

        let loaded = fx.registry().load_all().await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "ok");
    }

    #[tokio::test]
    async fn test_entry_without_exports_is_skipped() {
        let fx = Fixture::new(Some(r#"{"modules": ["empty"]}"#));
        let dir = fx.dir.path().join("modules/empty");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.toml"), "[module]\nname = \"empty\"\n").unwrap();

        assert!(fx.registry().load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_component_is_skipped() {
        let fx = Fixture::new(Some(r#"{"modules": ["mystery"]}"#));
        fx.add_module("mystery", "index.toml", "no-such-component");

        assert!(fx.registry().load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_is_enabled_tracks_declaration_not_loadability() {
        let fx = Fixture::new(Some(r#"{"modules": ["ghost"]}"#));
        // ghost has no directory and can never load
        let registry = fx.registry();
        assert!(registry.is_enabled("ghost").await);
        assert!(!registry.is_enabled("notice").await);
        assert!(registry.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_passes_reread_manifest() {
        let fx = Fixture::new(Some(r#"{"modules": []}"#));
        let registry = fx.registry();
        assert!(registry.load_all().await.is_empty());

        fx.add_module("late", "index.toml", "echo");
        fs::write(fx.dir.path().join("modules.json"), r#"{"modules": ["late"]}"#).unwrap();
        assert_eq!(registry.load_all().await.len(), 1);
    }
}

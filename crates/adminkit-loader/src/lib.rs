//! # AdminKit Loader
//!
//! Discovers enabled feature modules from a JSON manifest and assembles them
//! into composition units for the application's startup graph.
//!
//! The pipeline runs once per [`ModuleRegistry::load_all`] call:
//!
//! 1. **Manifest**: `modules.json` lists enabled module names, in order.
//! 2. **Resolve**: each name maps to `modules/<name>/`, whose entry file is
//!    `index.toml` or, failing that, `<name>.module.toml`.
//! 3. **Import**: the entry file is parsed and its selected export is
//!    instantiated through a compiled-in [`ComponentCatalog`].
//! 4. **Register**: successful units accumulate in manifest order.
//!
//! Every failure is local: a module that cannot be resolved or imported is
//! logged and skipped, never aborting the pass. The worst outcome is an
//! empty result, so optional modules cannot break application startup.

pub mod catalog;
pub mod entry;
pub mod error;
pub mod manifest;
pub mod registry;

pub use catalog::ComponentCatalog;
pub use entry::{ExportSpec, ModuleEntry};
pub use error::LoaderError;
pub use manifest::ModuleManifest;
pub use registry::{LoadedModule, ModuleRegistry};

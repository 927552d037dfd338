//! Loader error taxonomy.
//!
//! Every variant is reported and then tolerated: the loading pass records
//! the failure against the offending module and moves on.

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// Manifest file present but not valid, or missing the `modules` field.
    #[error("module manifest is malformed: {0}")]
    ManifestParse(String),

    /// Module directory absent.
    #[error("module directory not found: {0}")]
    ModuleNotFound(String),

    /// Module directory exists but contains no recognized entry file.
    #[error("no entry point found for module {0}")]
    EntryPointNotFound(String),

    /// Entry file unreadable, unparseable, or its export failed to build.
    #[error("failed to import module {module}: {reason}")]
    Import { module: String, reason: String },

    /// Entry file parsed but declares no exports.
    #[error("module {0} declares no exports")]
    EmptyModuleExport(String),
}

impl LoaderError {
    pub(crate) fn import(module: &str, reason: impl Into<String>) -> Self {
        Self::Import { module: module.into(), reason: reason.into() }
    }
}

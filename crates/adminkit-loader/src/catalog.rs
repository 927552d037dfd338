//! Compiled-in component catalog.
//!
//! Entry files reference components by name; the catalog maps each name to a
//! factory producing the composition unit. This is the explicit-registry
//! stand-in for runtime code loading: the set of loadable components is fixed
//! at compile time, while the manifest decides which of them activate.

use crate::entry::ExportSpec;
use std::collections::HashMap;

type Factory<T> = Box<dyn Fn(&ExportSpec) -> Result<T, String> + Send + Sync>;

/// Name → factory mapping, generic over the composition-unit type.
pub struct ComponentCatalog<T> {
    factories: HashMap<String, Factory<T>>,
}

impl<T> ComponentCatalog<T> {
    pub fn new() -> Self {
        Self { factories: HashMap::new() }
    }

    /// Register a factory under a component name.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&ExportSpec) -> Result<T, String> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Instantiate the component an export refers to.
    pub fn create(&self, export: &ExportSpec) -> Result<T, String> {
        match self.factories.get(&export.component) {
            Some(factory) => factory(export),
            None => Err(format!("unknown component '{}'", export.component)),
        }
    }
}

impl<T> Default for ComponentCatalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export(component: &str) -> ExportSpec {
        ExportSpec {
            name: "default".into(),
            component: component.into(),
            config: toml::Table::new(),
        }
    }

    #[test]
    fn test_register_and_create() {
        let mut catalog = ComponentCatalog::new();
        catalog.register("greeting", |_| Ok("hello"));
        assert!(catalog.contains("greeting"));
        assert_eq!(catalog.create(&export("greeting")).unwrap(), "hello");
    }

    #[test]
    fn test_unknown_component() {
        let catalog = ComponentCatalog::<()>::new();
        assert!(!catalog.contains("ghost"));
        let err = catalog.create(&export("ghost")).unwrap_err();
        assert!(err.contains("unknown component"));
    }

    #[test]
    fn test_factory_failure_propagates() {
        let mut catalog = ComponentCatalog::<()>::new();
        catalog.register("broken", |_| Err("boom".into()));
        assert_eq!(catalog.create(&export("broken")).unwrap_err(), "boom");
    }
}

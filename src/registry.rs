use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::errors::LoaderError;
use crate::source::DatasetBuilder;
use crate::source::sources::allocine::Allocine;
use crate::types::DatasetName;

/// Name-keyed set of dataset builders, populated explicitly by the host.
#[derive(Default)]
pub struct DatasetRegistry {
    builders: BTreeMap<DatasetName, Arc<dyn DatasetBuilder>>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every builder shipped with this crate.
    pub fn with_builtin() -> Self {
        let builtin: [Arc<dyn DatasetBuilder>; 1] = [Arc::new(Allocine::new())];
        let builders = builtin
            .into_iter()
            .map(|builder| (builder.name().to_string(), builder))
            .collect();
        Self { builders }
    }

    /// Register `builder` under its name. Names must be unique.
    pub fn register(&mut self, builder: Arc<dyn DatasetBuilder>) -> Result<(), LoaderError> {
        let name = builder.name().to_string();
        if self.builders.contains_key(&name) {
            return Err(LoaderError::DuplicateDataset(name));
        }
        debug!("[allocine:registry] registered dataset '{name}'");
        self.builders.insert(name, builder);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn DatasetBuilder>, LoaderError> {
        self.builders
            .get(name)
            .cloned()
            .ok_or_else(|| LoaderError::UnknownDataset(name.to_string()))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.builders.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_contains_allocine() {
        let registry = DatasetRegistry::with_builtin();
        assert_eq!(registry.names(), vec!["allocine"]);
        assert_eq!(registry.get("allocine").unwrap().name(), "allocine");
    }

    #[test]
    fn builtin_registry_rejects_reregistering_allocine() {
        let mut registry = DatasetRegistry::with_builtin();
        assert!(matches!(
            registry.register(Arc::new(Allocine::new())),
            Err(LoaderError::DuplicateDataset(name)) if name == "allocine"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = DatasetRegistry::new();
        assert!(registry.is_empty());
        registry.register(Arc::new(Allocine::new())).unwrap();
        assert!(matches!(
            registry.register(Arc::new(Allocine::new())),
            Err(LoaderError::DuplicateDataset(name)) if name == "allocine"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_names_are_reported() {
        let registry = DatasetRegistry::new();
        assert!(matches!(
            registry.get("imdb"),
            Err(LoaderError::UnknownDataset(name)) if name == "imdb"
        ));
    }
}

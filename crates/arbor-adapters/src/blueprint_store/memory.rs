//! In-memory blueprint store with built-in blueprints.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use arbor_core::{
    application::{ApplicationError, ports::BlueprintStore},
    domain::{DomainValidator as validator, PathSet},
    error::{ArborError, ArborResult},
};

use crate::builtin_blueprints;

/// Thread-safe in-memory blueprint store, keyed by name.
#[derive(Clone, Default)]
pub struct InMemoryBlueprintStore {
    inner: Arc<RwLock<BTreeMap<String, PathSet>>>,
}

impl InMemoryBlueprintStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with built-in blueprints loaded.
    pub fn with_builtin() -> ArborResult<Self> {
        let store = Self::new();
        store.load_builtin()?;
        Ok(store)
    }

    /// Load built-in blueprints.
    pub fn load_builtin(&self) -> ArborResult<()> {
        for blueprint in builtin_blueprints::all_blueprints() {
            self.insert(blueprint)?;
        }
        Ok(())
    }

    /// Get the number of blueprints.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlueprintStore for InMemoryBlueprintStore {
    fn get(&self, name: &str) -> ArborResult<PathSet> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.get(name).cloned().ok_or_else(|| {
            ApplicationError::BlueprintNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    fn list(&self) -> ArborResult<Vec<PathSet>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner.values().cloned().collect())
    }

    fn insert(&self, blueprint: PathSet) -> ArborResult<()> {
        // Validate before insertion
        validator::validate_path_set(&blueprint)?;

        let name = blueprint
            .name()
            .ok_or_else(|| ArborError::Configuration {
                message: "cannot store a blueprint without a name".into(),
            })?
            .to_string();

        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(name, blueprint);

        Ok(())
    }
}

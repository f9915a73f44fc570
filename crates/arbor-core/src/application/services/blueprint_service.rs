//! Blueprint Service - blueprint lookup and management.
//!
//! Separated from the Materializer for single responsibility: this service
//! never touches the target filesystem.

use tracing::{debug, instrument};

use crate::{
    application::ports::BlueprintStore,
    domain::{DomainValidator as validator, PathSet},
    error::{ArborError, ArborResult},
};

/// Information about a blueprint for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BlueprintInfo {
    pub name: String,
    pub description: String,
    pub directories: usize,
    pub files: usize,
}

impl From<&PathSet> for BlueprintInfo {
    fn from(set: &PathSet) -> Self {
        Self {
            name: set.name().unwrap_or("<unnamed>").to_string(),
            description: set.description().unwrap_or_default().to_string(),
            directories: set.directories().count(),
            files: set.files().count(),
        }
    }
}

/// Service for blueprint operations.
pub struct BlueprintService {
    store: Box<dyn BlueprintStore>,
}

impl BlueprintService {
    pub fn new(store: Box<dyn BlueprintStore>) -> Self {
        Self { store }
    }

    /// Get a blueprint by name.
    pub fn get(&self, name: &str) -> ArborResult<PathSet> {
        self.store.get(name)
    }

    /// Summaries of every stored blueprint, sorted by name.
    pub fn list(&self) -> ArborResult<Vec<BlueprintInfo>> {
        Ok(self.store.list()?.iter().map(BlueprintInfo::from).collect())
    }

    /// Validate and store a blueprint. Unnamed or invalid sets are refused.
    #[instrument(skip_all, fields(blueprint = blueprint.name().unwrap_or("<unnamed>")))]
    pub fn save(&self, blueprint: PathSet) -> ArborResult<()> {
        if blueprint.name().is_none() {
            return Err(ArborError::Configuration {
                message: "a stored blueprint needs a name".into(),
            });
        }
        validator::validate_path_set(&blueprint)?;
        debug!(entries = blueprint.len(), "Saving blueprint");
        self.store.insert(blueprint)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;
    use crate::application::ApplicationError;

    #[derive(Default)]
    struct MapStore(Mutex<BTreeMap<String, PathSet>>);

    impl BlueprintStore for MapStore {
        fn get(&self, name: &str) -> ArborResult<PathSet> {
            let map = self.0.lock().map_err(|_| ApplicationError::StoreLockError)?;
            map.get(name).cloned().ok_or_else(|| {
                ApplicationError::BlueprintNotFound {
                    name: name.to_string(),
                }
                .into()
            })
        }

        fn list(&self) -> ArborResult<Vec<PathSet>> {
            let map = self.0.lock().map_err(|_| ApplicationError::StoreLockError)?;
            Ok(map.values().cloned().collect())
        }

        fn insert(&self, blueprint: PathSet) -> ArborResult<()> {
            let mut map = self.0.lock().map_err(|_| ApplicationError::StoreLockError)?;
            let name = blueprint.name().unwrap_or_default().to_string();
            map.insert(name, blueprint);
            Ok(())
        }
    }

    fn service() -> BlueprintService {
        BlueprintService::new(Box::new(MapStore::default()))
    }

    #[test]
    fn save_then_list_counts_kinds() {
        let service = service();
        service
            .save(
                PathSet::named("web")
                    .with_description("small site")
                    .with_directory("app")
                    .with_file("app/page.tsx")
                    .with_file("README.md"),
            )
            .unwrap();

        let infos = service.list().unwrap();
        assert_eq!(
            infos,
            vec![BlueprintInfo {
                name: "web".into(),
                description: "small site".into(),
                directories: 1,
                files: 2,
            }]
        );
    }

    #[test]
    fn save_rejects_invalid_blueprint() {
        let service = service();
        let err = service
            .save(PathSet::named("bad").with_file("/etc/passwd"))
            .unwrap_err();
        assert!(matches!(err, ArborError::Specification(_)));
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn save_rejects_unnamed_blueprint() {
        assert!(service().save(PathSet::new().with_file("a")).is_err());
    }

    #[test]
    fn get_missing_is_not_found() {
        let err = service().get("ghost").unwrap_err();
        assert!(matches!(
            err,
            ArborError::Application(ApplicationError::BlueprintNotFound { .. })
        ));
    }
}

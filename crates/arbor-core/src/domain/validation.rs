use std::path::Path;

use crate::domain::{
    entities::{PathEntry, PathSet},
    error::SpecificationError,
    naming::Platform,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across callers.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_path_set(path_set: &PathSet) -> Result<(), SpecificationError> {
        path_set.validate()
    }

    /// Entries of `path_set` that the platform would refuse, with the reason.
    ///
    /// Does not validate the set itself; call [`Self::validate_path_set`] first.
    pub fn naming_violations<'a>(
        path_set: &'a PathSet,
        root: &Path,
        platform: Platform,
    ) -> Vec<(&'a PathEntry, crate::domain::EntryError)> {
        path_set
            .entries()
            .filter_map(|entry| {
                platform
                    .check_name(root, &entry.relative_path)
                    .err()
                    .map(|err| (entry, err))
            })
            .collect()
    }
}

pub mod common;
pub mod outcome;
pub mod path_set;

pub use crate::domain::SpecificationError;
pub use common::RelativePath;
pub use outcome::{EntryAction, EntryError, EntryReport, MaterializationResult, RunStatus};
pub use path_set::{EntryKind, PathEntry, PathSet};

//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `arbor-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: probe, ensure directory, ensure empty file
//!   - `BlueprintStore`: blueprint storage/retrieval
//!   - `MaterializeObserver`: progress reporting
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{BlueprintStore, Filesystem, MaterializeObserver, PathState, Phase};

#[cfg(test)]
pub use output::MockFilesystem;

//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "materialize a blueprint" or "list blueprints".

pub mod blueprint_service;
pub mod materializer;

pub use blueprint_service::{BlueprintInfo, BlueprintService};
pub use materializer::{MaterializeOptions, Materializer};

//! Arbor Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Arbor
//! tree materializer, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            arbor-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (Materializer, BlueprintService)      │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  (Driven: Filesystem, BlueprintStore)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     arbor-adapters (Infrastructure)     │
//! │ (LocalFilesystem, InMemoryBlueprintStore)│
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │   (PathSet, RelativePath, Platform)     │
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arbor_core::prelude::*;
//!
//! // 1. Describe the tree
//! let blueprint = PathSet::named("demo")
//!     .with_directory("app")
//!     .with_file("app/page.tsx");
//!
//! // 2. Materialize it through an injected filesystem adapter
//! let materializer = Materializer::new(Box::new(filesystem));
//! let result = materializer.materialize(&blueprint, "./out", &MaterializeOptions::default())?;
//! assert_eq!(result.created_count(), 2);
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BlueprintInfo, BlueprintService, CancellationToken, MaterializeOptions, Materializer,
        ports::{BlueprintStore, Filesystem, MaterializeObserver, PathState, Phase},
    };
    pub use crate::domain::{
        EntryAction, EntryError, EntryKind, EntryReport, MaterializationResult, PathEntry,
        PathSet, Platform, RelativePath, RunStatus, SpecificationError,
    };
    pub use crate::error::{ArborError, ArborResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

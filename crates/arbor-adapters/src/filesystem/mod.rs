//! Filesystem adapters.

mod local;
mod memory;

pub use local::{LocalFilesystem, classify_io_error};
pub use memory::MemoryFilesystem;

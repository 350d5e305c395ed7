//! sl-core: shared types, errors and configuration.
//!
//! This crate is the foundational dependency for all other sl-* crates,
//! providing the unified error type, the resource/item model the export
//! layer reads, the closed [`ExportType`] enumeration, and application
//! configuration.

pub mod config;
pub mod error;
pub mod export;
pub mod resource;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use export::{parse_export_types, ExportType};
pub use resource::*;

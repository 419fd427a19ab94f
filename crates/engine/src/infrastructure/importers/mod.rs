//! Importers for character sheets produced by external tools.
//!
//! Each importer maps a foreign layout onto the current record document and
//! runs it through the tolerant decoder.

mod builder;
mod builder_types;

pub use builder::{BuilderImporter, ImportError, CHARACTER_JSON_TYPE};

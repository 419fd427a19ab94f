//! Tavernkeep engine library.
//!
//! Filesystem-facing collaborators around the domain decoder.
//!
//! ## Structure
//!
//! - `config` - Environment-driven configuration
//! - `infrastructure/` - Ports plus their JSON-file, importer and exporter implementations
//! - `use_cases/` - One orchestration per command (import, export, list)

pub mod config;
pub mod infrastructure;
pub mod use_cases;

pub use config::EngineConfig;

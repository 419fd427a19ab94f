//! Engine configuration read from the environment.
//!
//! `.env` is loaded by the binary before this runs; library callers can build
//! an [`EngineConfig`] directly.

use std::path::PathBuf;

pub const DATA_DIR_VAR: &str = "TAVERNKEEP_DATA_DIR";
pub const EXPORT_DIR_VAR: &str = "TAVERNKEEP_EXPORT_DIR";
const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Root of the record store (`characters/`, `monsters/`)
    pub data_dir: PathBuf,
    /// Where export archives are written
    pub export_dir: PathBuf,
}

impl EngineConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            export_dir: data_dir.join("exports"),
            data_dir,
        }
    }

    pub fn with_export_dir(mut self, export_dir: impl Into<PathBuf>) -> Self {
        self.export_dir = export_dir.into();
        self
    }

    /// Read `TAVERNKEEP_DATA_DIR` (default `./data`) and
    /// `TAVERNKEEP_EXPORT_DIR` (default `<data>/exports`).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with an injectable variable source.
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key| lookup(key).filter(|value: &String| !value.trim().is_empty());
        let config = Self::new(var(DATA_DIR_VAR).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()));
        match var(EXPORT_DIR_VAR) {
            Some(export_dir) => config.with_export_dir(export_dir),
            None => config,
        }
    }

    pub fn characters_dir(&self) -> PathBuf {
        self.data_dir.join("characters")
    }

    pub fn monsters_dir(&self) -> PathBuf {
        self.data_dir.join("monsters")
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

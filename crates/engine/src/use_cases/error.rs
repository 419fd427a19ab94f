//! Errors surfaced by the roster use cases.

use tavernkeep_domain::CharacterId;

use crate::infrastructure::export::ExportError;
use crate::infrastructure::importers::ImportError;
use crate::infrastructure::ports::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Import error: {0}")]
    Import(#[from] ImportError),
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

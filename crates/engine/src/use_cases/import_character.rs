//! Import character use case.
//!
//! Reads a builder export, decodes it and stores the resulting record.

use std::path::Path;
use std::sync::Arc;

use tavernkeep_domain::{CharacterRecord, Decoded};

use crate::infrastructure::importers::BuilderImporter;
use crate::infrastructure::ports::CharacterStore;

use super::error::RosterError;

pub struct ImportCharacter {
    importer: BuilderImporter,
    store: Arc<dyn CharacterStore>,
}

impl ImportCharacter {
    pub fn new(importer: BuilderImporter, store: Arc<dyn CharacterStore>) -> Self {
        Self { importer, store }
    }

    /// Import `path` and save the record. The record is returned with every
    /// issue the decoder absorbed along the way.
    pub async fn execute(&self, path: &Path) -> Result<Decoded<CharacterRecord>, RosterError> {
        let decoded = self.importer.import_file(path).await?;
        self.store.save(&decoded.value).await?;
        tracing::info!(
            character_id = %decoded.value.id(),
            issues = decoded.issues.len(),
            "Character imported"
        );
        Ok(decoded)
    }
}

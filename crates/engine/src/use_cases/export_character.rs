//! Export character use case.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tavernkeep_domain::CharacterId;

use crate::infrastructure::export::ArchiveExporter;
use crate::infrastructure::ports::CharacterStore;

use super::error::RosterError;

pub struct ExportCharacter {
    store: Arc<dyn CharacterStore>,
    exporter: ArchiveExporter,
}

impl ExportCharacter {
    pub fn new(store: Arc<dyn CharacterStore>, exporter: ArchiveExporter) -> Self {
        Self { store, exporter }
    }

    /// Write an archive for `id` to `output`, or to the export directory when
    /// no output is given. Returns the path written.
    pub async fn execute(
        &self,
        id: CharacterId,
        output: Option<&Path>,
    ) -> Result<PathBuf, RosterError> {
        let character = self
            .store
            .load(id)
            .await?
            .ok_or(RosterError::CharacterNotFound(id))?;
        let archive = self.exporter.archive(character);

        let path = match output {
            Some(output) => {
                self.exporter.write_to(&archive, output).await?;
                output.to_path_buf()
            }
            None => self.exporter.write(&archive).await?,
        };
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::MockCharacterStore;
    use chrono::{TimeZone, Utc};
    use tavernkeep_domain::{AbilityScores, CharacterName, CharacterRecord};

    fn exporter(dir: &Path) -> ArchiveExporter {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        ArchiveExporter::new(dir, Arc::new(FixedClock(now)))
    }

    #[tokio::test]
    async fn when_character_missing_returns_not_found() {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let id = CharacterId::new();

        let mut store = MockCharacterStore::new();
        store
            .expect_load()
            .withf(move |requested| *requested == id)
            .returning(|_| Ok(None));

        let use_case = ExportCharacter::new(Arc::new(store), exporter(temp_dir.path()));
        let result = use_case.execute(id, None).await;

        assert!(matches!(result, Err(RosterError::CharacterNotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn writes_to_requested_output() {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let record = CharacterRecord::new(
            CharacterName::new("Вейл").unwrap(),
            AbilityScores::default(),
            10,
            Utc::now(),
        );
        let id = record.id();

        let mut store = MockCharacterStore::new();
        store
            .expect_load()
            .returning(move |_| Ok(Some(record.clone())));

        let output = temp_dir.path().join("out").join("vale.json");
        let use_case = ExportCharacter::new(Arc::new(store), exporter(temp_dir.path()));
        let path = use_case.execute(id, Some(&output)).await.unwrap();

        assert_eq!(path, output);
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["character"]["id"], id.to_string());
    }
}

//! Directory-backed record store.
//!
//! Layout under the data directory:
//!
//! ```text
//! characters/<uuid>.json
//! monsters/<uuid>.json
//! ```
//!
//! Reads go through the tolerant decoder, so documents written by older
//! versions load as long as their required fields survive. Writes always use
//! the current shape and replace the previous file atomically.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tavernkeep_domain::{
    decode_character, decode_monster, CharacterId, CharacterRecord, DecodeContext, DecodeError,
    Decoded, MonsterId, MonsterRecord,
};
use tokio::fs;

use crate::infrastructure::ports::{
    CharacterStore, ClockPort, Listing, LoadFailure, MonsterStore, StoreError,
};

type DecodeFn<T> = fn(&Value, &DecodeContext) -> Result<Decoded<T>, DecodeError>;

/// One subdirectory of JSON documents of a single record type, each named
/// after the id of the record it holds.
struct Collection<T, I> {
    dir: PathBuf,
    kind: &'static str,
    decode: DecodeFn<T>,
    id_of: fn(&T) -> I,
}

impl<T: Serialize, I: Display + FromStr> Collection<T, I> {
    fn path_for(&self, id: impl Display) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    async fn load(
        &self,
        path: &Path,
        clock: &dyn ClockPort,
    ) -> Result<Option<T>, StoreError> {
        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io("read record", e)),
        };
        let mut document: Value =
            serde_json::from_str(&raw).map_err(|e| StoreError::json(path, &e))?;
        adopt_file_id::<I>(&mut document, path);
        let decoded = (self.decode)(&document, &DecodeContext::at(clock.now()))
            .map_err(|e| StoreError::decode(path, e))?;
        for issue in &decoded.issues {
            if issue.is_data_loss() {
                tracing::warn!(kind = self.kind, path = %path.display(), %issue, "Record decoded with data loss");
            } else {
                tracing::debug!(kind = self.kind, path = %path.display(), %issue, "Record migrated");
            }
        }
        self.settle_identity(path, &decoded.value).await?;
        Ok(Some(decoded.value))
    }

    /// Move a document whose record id differs from its file name to the
    /// path of that id, so the id stays the same on every later load.
    async fn settle_identity(&self, path: &Path, record: &T) -> Result<(), StoreError> {
        let id = (self.id_of)(record);
        let target = self.path_for(&id);
        if target == path {
            return Ok(());
        }
        let occupied = fs::try_exists(&target)
            .await
            .map_err(|e| StoreError::io("check record path", e))?;
        if occupied {
            tracing::warn!(kind = self.kind, path = %path.display(), %id, "Document duplicates an existing record id");
            return Ok(());
        }
        self.save(&id, record).await?;
        fs::remove_file(path)
            .await
            .map_err(|e| StoreError::io("remove re-keyed record", e))?;
        tracing::info!(kind = self.kind, from = %path.display(), to = %target.display(), "Record re-keyed to its id");
        Ok(())
    }

    /// Write to a sibling temp file, then rename over the target.
    async fn save(&self, id: impl Display, record: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io("create store directory", e))?;
        let body = serde_json::to_vec_pretty(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let target = self.path_for(&id);
        let temp = self.dir.join(format!(".{}.json.tmp", id));
        fs::write(&temp, body)
            .await
            .map_err(|e| StoreError::io("write temp record", e))?;
        if let Err(e) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StoreError::io("replace record", e));
        }
        tracing::debug!(kind = self.kind, path = %target.display(), "Record saved");
        Ok(())
    }

    async fn delete(&self, id: impl Display) -> Result<bool, StoreError> {
        match fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io("delete record", e)),
        }
    }

    /// Load every `*.json` document. A bad document is reported, not fatal.
    async fn list(&self, clock: &dyn ClockPort) -> Result<Listing<T>, StoreError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Listing::default()),
            Err(e) => return Err(StoreError::io("list records", e)),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io("list records", e))?
        {
            let path = entry.path();
            let is_document = path.extension().is_some_and(|ext| ext == "json")
                && !path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with('.'));
            if is_document {
                paths.push(path);
            }
        }
        paths.sort();

        let mut listing = Listing::default();
        for path in paths {
            match self.load(&path, clock).await {
                Ok(Some(record)) => listing.records.push(record),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(kind = self.kind, path = %path.display(), error = %e, "Skipping unreadable record");
                    listing.failures.push(LoadFailure {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(listing)
    }
}

/// A document without a usable id takes its file stem when the stem is one.
fn adopt_file_id<I: FromStr>(document: &mut Value, path: &Path) {
    let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
        return;
    };
    if stem.parse::<I>().is_err() {
        return;
    }
    let Some(fields) = document.as_object_mut() else {
        return;
    };
    let has_id = fields
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| id.parse::<I>().is_ok());
    if !has_id {
        fields.insert("id".to_string(), Value::String(stem.to_string()));
    }
}

/// JSON file store for characters and monsters.
pub struct JsonFileStore {
    characters: Collection<CharacterRecord, CharacterId>,
    monsters: Collection<MonsterRecord, MonsterId>,
    clock: Arc<dyn ClockPort>,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>, clock: Arc<dyn ClockPort>) -> Self {
        let data_dir = data_dir.into();
        Self {
            characters: Collection {
                dir: data_dir.join("characters"),
                kind: "character",
                decode: decode_character,
                id_of: CharacterRecord::id,
            },
            monsters: Collection {
                dir: data_dir.join("monsters"),
                kind: "monster",
                decode: decode_monster,
                id_of: MonsterRecord::id,
            },
            clock,
        }
    }

    /// Path a character document lives at, whether or not it exists yet.
    pub fn character_path(&self, id: CharacterId) -> PathBuf {
        self.characters.path_for(id)
    }

    pub fn monster_path(&self, id: MonsterId) -> PathBuf {
        self.monsters.path_for(id)
    }
}

#[async_trait]
impl CharacterStore for JsonFileStore {
    async fn load(&self, id: CharacterId) -> Result<Option<CharacterRecord>, StoreError> {
        let path = self.characters.path_for(id);
        self.characters.load(&path, self.clock.as_ref()).await
    }

    async fn save(&self, record: &CharacterRecord) -> Result<(), StoreError> {
        self.characters.save(record.id(), record).await
    }

    async fn delete(&self, id: CharacterId) -> Result<bool, StoreError> {
        self.characters.delete(id).await
    }

    async fn list(&self) -> Result<Listing<CharacterRecord>, StoreError> {
        self.characters.list(self.clock.as_ref()).await
    }
}

#[async_trait]
impl MonsterStore for JsonFileStore {
    async fn load(&self, id: MonsterId) -> Result<Option<MonsterRecord>, StoreError> {
        let path = self.monsters.path_for(id);
        self.monsters.load(&path, self.clock.as_ref()).await
    }

    async fn save(&self, record: &MonsterRecord) -> Result<(), StoreError> {
        self.monsters.save(record.id(), record).await
    }

    async fn delete(&self, id: MonsterId) -> Result<bool, StoreError> {
        self.monsters.delete(id).await
    }

    async fn list(&self) -> Result<Listing<MonsterRecord>, StoreError> {
        self.monsters.list(self.clock.as_ref()).await
    }
}

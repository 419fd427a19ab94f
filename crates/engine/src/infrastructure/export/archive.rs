//! Character export archives.
//!
//! An archive is a self-contained JSON file holding one character and the
//! companion entries kept alongside it (notes, relationships, quotes and
//! compendium bookmarks). Archives are read back through the same tolerant
//! decoder as stored records, so an archive written by an older version still
//! imports.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tavernkeep_domain::decode::coerce;
use tavernkeep_domain::{
    decode_character, CharacterRecord, DecodeContext, DecodeError, DecodeIssue, Decoded,
    FavoriteSpell, MagicItem, Note, Quote, Relationship,
};
use tokio::fs;

use crate::infrastructure::ports::ClockPort;

/// Version written into every new archive.
pub const FORMAT_VERSION: &str = "2";

/// Versions [`ArchiveExporter::read`] understands. Version 1 archives carry a
/// legacy-shaped character, which the decoder migrates.
const READABLE_VERSIONS: [&str; 2] = ["1", FORMAT_VERSION];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Archive character could not be decoded: {0}")]
    Decode(#[from] DecodeError),
    #[error("Unsupported archive version: {0}")]
    UnsupportedVersion(String),
}

/// Complete export of one character.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportArchive {
    pub format_version: String,
    pub exported_at: DateTime<Utc>,
    pub character: CharacterRecord,
    pub relationships: Vec<Relationship>,
    pub notes: Vec<Note>,
    pub quotes: Vec<Quote>,
    pub favorite_spells: Vec<FavoriteSpell>,
    pub magic_items: Vec<MagicItem>,
}

impl ExportArchive {
    pub fn new(character: CharacterRecord, exported_at: DateTime<Utc>) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            exported_at,
            character,
            relationships: Vec::new(),
            notes: Vec::new(),
            quotes: Vec::new(),
            favorite_spells: Vec::new(),
            magic_items: Vec::new(),
        }
    }

    pub fn with_relationships(mut self, relationships: Vec<Relationship>) -> Self {
        self.relationships = relationships;
        self
    }

    pub fn with_notes(mut self, notes: Vec<Note>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_quotes(mut self, quotes: Vec<Quote>) -> Self {
        self.quotes = quotes;
        self
    }

    pub fn with_favorite_spells(mut self, favorite_spells: Vec<FavoriteSpell>) -> Self {
        self.favorite_spells = favorite_spells;
        self
    }

    pub fn with_magic_items(mut self, magic_items: Vec<MagicItem>) -> Self {
        self.magic_items = magic_items;
        self
    }
}

/// Writes and reads export archives under a single directory.
pub struct ArchiveExporter {
    export_dir: PathBuf,
    clock: Arc<dyn ClockPort>,
}

impl ArchiveExporter {
    pub fn new(export_dir: impl Into<PathBuf>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            export_dir: export_dir.into(),
            clock,
        }
    }

    /// Start an archive for `character`, stamped with the current time.
    pub fn archive(&self, character: CharacterRecord) -> ExportArchive {
        ExportArchive::new(character, self.clock.now())
    }

    /// Write to `<export_dir>/<character id>.json` and return that path.
    pub async fn write(&self, archive: &ExportArchive) -> Result<PathBuf, ExportError> {
        let path = self
            .export_dir
            .join(format!("{}.json", archive.character.id()));
        self.write_to(archive, &path).await?;
        Ok(path)
    }

    pub async fn write_to(&self, archive: &ExportArchive, path: &Path) -> Result<(), ExportError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(archive)?;
        fs::write(path, body).await?;
        tracing::info!(
            character = %archive.character.name(),
            path = %path.display(),
            "Character archive written"
        );
        Ok(())
    }

    pub async fn read_file(&self, path: &Path) -> Result<Decoded<ExportArchive>, ExportError> {
        let raw = fs::read_to_string(path).await?;
        let document: Value = serde_json::from_str(&raw)?;
        self.read(&document)
    }

    /// Read an archive document.
    ///
    /// The character must decode; a malformed companion entry is dropped and
    /// reported as an issue.
    pub fn read(&self, document: &Value) -> Result<Decoded<ExportArchive>, ExportError> {
        let root = document.as_object().ok_or(DecodeError::NotAnObject)?;
        let version = root
            .get("formatVersion")
            .and_then(coerce::loose_text)
            .unwrap_or_else(|| "1".to_string());
        if !READABLE_VERSIONS.contains(&version.as_str()) {
            return Err(ExportError::UnsupportedVersion(version));
        }

        let now = self.clock.now();
        let character = root
            .get("character")
            .filter(|value| !value.is_null())
            .ok_or(DecodeError::missing("character"))?;
        let Decoded {
            value: character,
            mut issues,
        } = decode_character(character, &DecodeContext::at(now))?;

        let exported_at = root
            .get("exportedAt")
            .and_then(coerce::timestamp)
            .unwrap_or(now);

        let archive = ExportArchive {
            format_version: FORMAT_VERSION.to_string(),
            exported_at,
            character,
            relationships: entries(root.get("relationships"), "relationships", &mut issues),
            notes: entries(root.get("notes"), "notes", &mut issues),
            quotes: entries(root.get("quotes"), "quotes", &mut issues),
            favorite_spells: entries(root.get("favoriteSpells"), "favoriteSpells", &mut issues),
            magic_items: entries(root.get("magicItems"), "magicItems", &mut issues),
        };
        for issue in issues.iter().filter(|issue| issue.is_data_loss()) {
            tracing::warn!(%issue, "Archive read lost data");
        }
        Ok(Decoded {
            value: archive,
            issues,
        })
    }
}

/// Decode each element on its own; a bad element drops alone.
fn entries<T: DeserializeOwned>(
    value: Option<&Value>,
    collection: &'static str,
    issues: &mut Vec<DecodeIssue>,
) -> Vec<T> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(item) {
            Ok(entry) => Some(entry),
            Err(_) => {
                issues.push(DecodeIssue::MalformedElement { collection, index });
                None
            }
        })
        .collect()
}

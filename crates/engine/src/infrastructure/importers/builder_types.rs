//! Type definitions for the online character-builder export format.
//!
//! The builder wraps every sheet in an envelope whose `data` member is either
//! the sheet object itself or the same object serialized into a string. Most
//! leaves are `{ "value": ... }` wrappers, and numbers frequently arrive as
//! text, so leaf values stay as raw JSON and are read with the lenient
//! helpers in `tavernkeep_domain::decode::coerce`.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Outer wrapper of a builder export file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderEnvelope {
    /// `"character"` for character sheets. Older exports omit it.
    #[serde(default)]
    pub json_type: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// The character sheet proper.
///
/// Sections the importer does not map (spell books, conditions, edit
/// history) are ignored by serde.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderSheet {
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub info: Map<String, Value>,
    /// `None` distinguishes a missing section from an empty one
    #[serde(default)]
    pub stats: Option<Map<String, Value>>,
    #[serde(default)]
    pub saves: Map<String, Value>,
    #[serde(default)]
    pub skills: Map<String, Value>,
    #[serde(default)]
    pub vitality: Map<String, Value>,
    #[serde(default)]
    pub coins: Map<String, Value>,
    #[serde(default)]
    pub text: Map<String, Value>,
    #[serde(default)]
    pub resources: Map<String, Value>,
    /// Rows are read one at a time so a malformed row drops alone
    #[serde(default)]
    pub weapons_list: Vec<Value>,
    #[serde(default)]
    pub inspiration: Value,
    #[serde(default)]
    pub avatar: Option<BuilderAvatar>,
}

/// One row of the attacks table.
#[derive(Debug, Default, Deserialize)]
pub struct BuilderWeapon {
    #[serde(default)]
    pub name: Value,
    #[serde(default, rename = "mod")]
    pub modifier: Value,
    #[serde(default)]
    pub dmg: Value,
}

/// Portrait data URIs, one per encoding the builder produced.
#[derive(Debug, Default, Deserialize)]
pub struct BuilderAvatar {
    #[serde(default)]
    pub webp: Option<String>,
    #[serde(default)]
    pub jpeg: Option<String>,
}

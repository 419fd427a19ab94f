//! Entities kept alongside a character and bundled into export archives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{NoteId, QuoteId, RelationshipId};

/// A free-form session note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default)]
    pub id: NoteId,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub date_created: DateTime<Utc>,
}

impl Note {
    pub fn new(title: impl Into<String>, body: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: NoteId::new(),
            title: title.into(),
            body: body.into(),
            date_created: now,
        }
    }
}

/// How the character feels about someone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attitude {
    Friendly,
    #[default]
    Neutral,
    Hostile,
}

/// A person (or faction) the character knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(default)]
    pub id: RelationshipId,
    pub name: String,
    /// Free text such as "mentor", "rival", "sister"
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub attitude: Attitude,
    #[serde(default)]
    pub description: String,
}

impl Relationship {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, attitude: Attitude) -> Self {
        Self {
            id: RelationshipId::new(),
            name: name.into(),
            kind: kind.into(),
            attitude,
            description: String::new(),
        }
    }
}

/// A memorable line said at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(default)]
    pub id: QuoteId,
    pub text: String,
    #[serde(default)]
    pub author: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: QuoteId::new(),
            text: text.into(),
            author: author.into(),
        }
    }
}

/// A spell bookmarked from the compendium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteSpell {
    pub name: String,
    /// 0 for cantrips
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub school: String,
}

/// A magic item from the compendium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicItem {
    pub name: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub requires_attunement: bool,
    #[serde(default)]
    pub description: String,
}

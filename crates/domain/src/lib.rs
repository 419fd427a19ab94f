//! Tavernkeep domain: character records, tolerant decoding and resource
//! classification.
//!
//! This crate performs no I/O. Timestamps come in through
//! [`decode::DecodeContext`] or explicit `now` arguments, and everything the
//! decoder absorbs is returned as data for the caller to log.

pub mod aggregates;
pub mod classifier;
pub mod decode;
pub mod entities;
pub mod error;
pub mod game_systems;
pub mod ids;
pub mod rich_text;
pub mod value_objects;

// Re-export aggregates
pub use aggregates::{CharacterRecord, MonsterRecord, Personality};

// Re-export entities (explicit list in entities/mod.rs)
pub use entities::{
    ActiveEffect, Attitude, ClassEntry, Currency, EquipmentItem, FavoriteSpell, Feature, ItemType,
    MagicItem, Note, Quote, Relationship, ResourceDescriptor, RestKind, TreasureItem,
};

pub use classifier::{classify, ClassificationRule, ResourceCategory, CLASSIFICATION_RULES};
pub use decode::{decode_character, decode_monster, DecodeContext, DecodeError, DecodeIssue, Decoded};
pub use error::DomainError;
pub use rich_text::flatten_rich_text;

// Re-export ID types
pub use ids::{CharacterId, EffectId, MonsterId, NoteId, QuoteId, RelationshipId, ResourceId};

// Re-export value objects (explicit list in value_objects/mod.rs)
pub use value_objects::{
    Ability, AbilityScores, ChallengeRating, CharacterName, MonsterName, ProficiencyLevel, Skill,
};

//! Primary records with encapsulated state.

pub mod character;
pub mod monster;

pub use character::{CharacterRecord, Personality};
pub use monster::MonsterRecord;

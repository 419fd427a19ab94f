//! Value objects shared by every record type.

mod ability;
mod challenge_rating;
mod names;
mod skill;

pub use ability::{Ability, AbilityScores};
pub use challenge_rating::ChallengeRating;
pub use names::{CharacterName, MonsterName};
pub use skill::{ProficiencyLevel, Skill};

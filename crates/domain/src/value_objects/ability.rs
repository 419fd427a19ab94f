//! The six ability scores and their identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// One of the six core abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    /// All abilities in sheet order.
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Full lower-case key used on the wire.
    pub fn key(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Dexterity => "dexterity",
            Self::Constitution => "constitution",
            Self::Intelligence => "intelligence",
            Self::Wisdom => "wisdom",
            Self::Charisma => "charisma",
        }
    }

    /// Three-letter abbreviation (`str`, `dex`, ...).
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Strength => "str",
            Self::Dexterity => "dex",
            Self::Constitution => "con",
            Self::Intelligence => "int",
            Self::Wisdom => "wis",
            Self::Charisma => "cha",
        }
    }

    /// Position in [`Ability::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lenient lookup: full name, abbreviation, or Russian sheet label.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "strength" | "str" | "сила" | "сил" => Some(Self::Strength),
            "dexterity" | "dex" | "ловкость" | "лов" => Some(Self::Dexterity),
            "constitution" | "con" | "телосложение" | "тел" => Some(Self::Constitution),
            "intelligence" | "int" | "интеллект" | "инт" => Some(Self::Intelligence),
            "wisdom" | "wis" | "мудрость" | "мдр" => Some(Self::Wisdom),
            "charisma" | "cha" | "харизма" | "хар" => Some(Self::Charisma),
            _ => None,
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Ability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| DomainError::parse(format!("Unknown ability: {}", s)))
    }
}

/// Base ability scores. Modifiers are always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::uniform(10)
    }
}

impl AbilityScores {
    pub fn new(
        strength: i32,
        dexterity: i32,
        constitution: i32,
        intelligence: i32,
        wisdom: i32,
        charisma: i32,
    ) -> Self {
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        }
    }

    pub fn uniform(score: i32) -> Self {
        Self::new(score, score, score, score, score, score)
    }

    /// Build from scores listed in [`Ability::ALL`] order.
    pub fn from_array(scores: [i32; 6]) -> Self {
        let [strength, dexterity, constitution, intelligence, wisdom, charisma] = scores;
        Self::new(strength, dexterity, constitution, intelligence, wisdom, charisma)
    }

    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, score: i32) {
        match ability {
            Ability::Strength => self.strength = score,
            Ability::Dexterity => self.dexterity = score,
            Ability::Constitution => self.constitution = score,
            Ability::Intelligence => self.intelligence = score,
            Ability::Wisdom => self.wisdom = score,
            Ability::Charisma => self.charisma = score,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ability, i32)> + '_ {
        Ability::ALL.iter().map(move |&a| (a, self.get(a)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_accepts_all_spellings() {
        assert_eq!(Ability::from_name("STR"), Some(Ability::Strength));
        assert_eq!(Ability::from_name("Wisdom"), Some(Ability::Wisdom));
        assert_eq!(Ability::from_name("Харизма"), Some(Ability::Charisma));
        assert_eq!(Ability::from_name("luck"), None);
    }

    #[test]
    fn array_order_matches_all() {
        let scores = AbilityScores::from_array([8, 10, 12, 14, 16, 18]);
        let collected: Vec<i32> = scores.iter().map(|(_, s)| s).collect();
        assert_eq!(collected, vec![8, 10, 12, 14, 16, 18]);
        assert_eq!(scores.get(Ability::Charisma), 18);
    }

    #[test]
    fn set_updates_single_score() {
        let mut scores = AbilityScores::default();
        scores.set(Ability::Dexterity, 17);
        assert_eq!(scores.dexterity, 17);
        assert_eq!(scores.strength, 10);
    }
}

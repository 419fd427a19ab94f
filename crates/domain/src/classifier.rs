//! Resource type classification.
//!
//! Assigns a [`ResourceCategory`] to a class resource pool from its free-text
//! name, icon identifier and location tag. The rule table is data: rules are
//! evaluated top to bottom, a rule matches when any of its patterns is a
//! substring of the corresponding lower-cased input, and the first match wins.
//! Reordering [`CLASSIFICATION_RULES`] changes results for inputs that match
//! more than one rule.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic grouping for a resource pool. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceCategory {
    Rage,
    WildMagic,
    WildShape,
    Ki,
    SorceryPoints,
    BardicInspiration,
    ChannelDivinity,
    LayOnHands,
    Superiority,
    SpellSlots,
    Fighter,
    HitDice,
    #[default]
    Other,
}

impl ResourceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rage => "rage",
            Self::WildMagic => "wildMagic",
            Self::WildShape => "wildShape",
            Self::Ki => "ki",
            Self::SorceryPoints => "sorceryPoints",
            Self::BardicInspiration => "bardicInspiration",
            Self::ChannelDivinity => "channelDivinity",
            Self::LayOnHands => "layOnHands",
            Self::Superiority => "superiority",
            Self::SpellSlots => "spellSlots",
            Self::Fighter => "fighter",
            Self::HitDice => "hitDice",
            Self::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Rage => "Rage",
            Self::WildMagic => "Wild Magic",
            Self::WildShape => "Wild Shape",
            Self::Ki => "Ki",
            Self::SorceryPoints => "Sorcery Points",
            Self::BardicInspiration => "Bardic Inspiration",
            Self::ChannelDivinity => "Channel Divinity",
            Self::LayOnHands => "Lay on Hands",
            Self::Superiority => "Superiority Dice",
            Self::SpellSlots => "Spell Slots",
            Self::Fighter => "Fighter Techniques",
            Self::HitDice => "Hit Dice",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One row of the classification table. All patterns are lower case.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub category: ResourceCategory,
    pub name_patterns: &'static [&'static str],
    pub icon_patterns: &'static [&'static str],
    pub location_patterns: &'static [&'static str],
}

impl ClassificationRule {
    /// True when any pattern of any dimension occurs in the matching input.
    /// Inputs must already be lower case.
    fn matches(&self, name: &str, icon: &str, location: &str) -> bool {
        fn any_in(patterns: &[&str], input: &str) -> bool {
            !input.is_empty() && patterns.iter().any(|p| input.contains(p))
        }
        any_in(self.name_patterns, name)
            || any_in(self.icon_patterns, icon)
            || any_in(self.location_patterns, location)
    }
}

/// Ordered rule table. Earlier rows win.
///
/// Known overlap: the Russian stem `"дик"` ("wild") appears under both
/// [`ResourceCategory::WildMagic`] (via `"дикая магия"`) and
/// [`ResourceCategory::WildShape`] (as a bare stem). Any name that contains
/// "дикая магия" resolves to wild magic only because that row comes first.
pub static CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        category: ResourceCategory::Rage,
        name_patterns: &["ярост", "rage", "неистов"],
        icon_patterns: &["rage", "berserk"],
        location_patterns: &[],
    },
    ClassificationRule {
        category: ResourceCategory::WildMagic,
        name_patterns: &["дикая магия", "wild magic", "хаос", "chaos", "surge"],
        icon_patterns: &["chaos", "surge"],
        location_patterns: &[],
    },
    ClassificationRule {
        category: ResourceCategory::WildShape,
        name_patterns: &["дик", "облик", "wild shape", "wildshape"],
        icon_patterns: &["wild", "paw", "beast"],
        location_patterns: &[],
    },
    ClassificationRule {
        category: ResourceCategory::Ki,
        name_patterns: &["очки ци", "очков ци", "ki point", "ki ", "focus point", "концентрац"],
        icon_patterns: &["ki-", "monk", "fist"],
        location_patterns: &[],
    },
    ClassificationRule {
        category: ResourceCategory::SorceryPoints,
        name_patterns: &["чародейств", "единицы чар", "sorcery", "metamagic", "метамаг"],
        icon_patterns: &["sorcer", "metamagic"],
        location_patterns: &[],
    },
    ClassificationRule {
        category: ResourceCategory::BardicInspiration,
        name_patterns: &["вдохновени", "inspiration", "бард"],
        icon_patterns: &["lute", "music", "bard"],
        location_patterns: &[],
    },
    ClassificationRule {
        category: ResourceCategory::ChannelDivinity,
        name_patterns: &["божественн", "channel divinity", "проведение"],
        icon_patterns: &["divin", "holy"],
        location_patterns: &[],
    },
    ClassificationRule {
        category: ResourceCategory::LayOnHands,
        name_patterns: &["наложение рук", "lay on hands"],
        icon_patterns: &["hands", "heal"],
        location_patterns: &[],
    },
    ClassificationRule {
        category: ResourceCategory::Superiority,
        name_patterns: &["превосходств", "superiority", "маневр", "manoeuvre", "maneuver"],
        icon_patterns: &["maneuver"],
        location_patterns: &[],
    },
    ClassificationRule {
        category: ResourceCategory::SpellSlots,
        name_patterns: &["ячейк", "ячейки", "spell slot", "слот"],
        icon_patterns: &["spell", "magic"],
        location_patterns: &["spells", "заклинан"],
    },
    ClassificationRule {
        category: ResourceCategory::Fighter,
        name_patterns: &["всплеск действи", "action surge", "второе дыхание", "second wind"],
        icon_patterns: &["surge-action", "wind"],
        location_patterns: &[],
    },
    ClassificationRule {
        category: ResourceCategory::HitDice,
        name_patterns: &["кости хитов", "кость хитов", "hit dice", "hit die"],
        icon_patterns: &["dice", "d20"],
        location_patterns: &[],
    },
];

/// Classify a resource from its metadata. Pure and deterministic.
pub fn classify(name: &str, icon: &str, location: &str) -> ResourceCategory {
    classify_with(CLASSIFICATION_RULES, name, icon, location)
}

/// Classify against an arbitrary rule table.
pub fn classify_with(
    rules: &[ClassificationRule],
    name: &str,
    icon: &str,
    location: &str,
) -> ResourceCategory {
    let (name, icon, location) = normalize(name, icon, location);
    rules
        .iter()
        .find(|rule| rule.matches(&name, &icon, &location))
        .map(|rule| rule.category)
        .unwrap_or(ResourceCategory::Other)
}

/// Every category whose rule matches, in table order. The first entry is what
/// [`classify`] returns; more than one entry means the input sits in an
/// overlap and only the table order decides.
pub fn matching_categories(name: &str, icon: &str, location: &str) -> Vec<ResourceCategory> {
    let (name, icon, location) = normalize(name, icon, location);
    CLASSIFICATION_RULES
        .iter()
        .filter(|rule| rule.matches(&name, &icon, &location))
        .map(|rule| rule.category)
        .collect()
}

fn normalize(name: &str, icon: &str, location: &str) -> (String, String, String) {
    (name.to_lowercase(), icon.to_lowercase(), location.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod table {
        use super::*;

        #[test]
        fn every_pattern_is_non_empty_lower_case() {
            for rule in CLASSIFICATION_RULES {
                let patterns = rule
                    .name_patterns
                    .iter()
                    .chain(rule.icon_patterns)
                    .chain(rule.location_patterns);
                for pattern in patterns {
                    assert!(!pattern.is_empty(), "{:?} has an empty pattern", rule.category);
                    assert_eq!(*pattern, pattern.to_lowercase());
                }
            }
        }

        #[test]
        fn other_is_not_a_rule() {
            assert!(CLASSIFICATION_RULES
                .iter()
                .all(|r| r.category != ResourceCategory::Other));
        }
    }

    mod classify {
        use super::*;

        #[test]
        fn rage_by_name() {
            assert_eq!(
                classify("Ярость берсерка", "sword-icon", "traits"),
                ResourceCategory::Rage
            );
        }

        #[test]
        fn empty_inputs_fall_through() {
            assert_eq!(classify("", "", ""), ResourceCategory::Other);
        }

        #[test]
        fn unknown_inputs_fall_through() {
            assert_eq!(
                classify("Удача", "clover", "traits"),
                ResourceCategory::Other
            );
        }

        #[test]
        fn case_insensitive() {
            assert_eq!(classify("RAGE", "", ""), ResourceCategory::Rage);
            assert_eq!(classify("", "", "SPELLS"), ResourceCategory::SpellSlots);
        }

        #[test]
        fn icon_and_location_dimensions() {
            assert_eq!(classify("Пул", "monk-fist", ""), ResourceCategory::Ki);
            assert_eq!(classify("1 уровень", "", "spells"), ResourceCategory::SpellSlots);
        }

        #[test]
        fn identical_metadata_classifies_identically() {
            let a = classify("Очки ци", "ki-icon", "traits");
            let b = classify("Очки ци", "ki-icon", "traits");
            assert_eq!(a, b);
            assert_eq!(a, ResourceCategory::Ki);
        }
    }

    mod priority {
        use super::*;

        #[test]
        fn wild_magic_resolves_by_table_order() {
            // Matches both the wild-magic row and the bare "дик" stem of wild shape.
            let candidates = matching_categories("Дикая магия хаоса", "chaos-icon", "traits");
            assert_eq!(
                candidates,
                vec![ResourceCategory::WildMagic, ResourceCategory::WildShape]
            );
            assert_eq!(
                classify("Дикая магия хаоса", "chaos-icon", "traits"),
                ResourceCategory::WildMagic
            );
            assert_ne!(
                classify("Дикая магия хаоса", "chaos-icon", "traits"),
                ResourceCategory::Rage
            );
        }

        #[test]
        fn wild_stem_overlap_is_pinned() {
            // "Дикий всплеск" is a wild-magic feature, but only the bare "дик"
            // stem of the wild-shape row matches it. Kept as-is for compatibility.
            assert_eq!(
                classify("Дикий всплеск", "", "traits"),
                ResourceCategory::WildShape
            );
        }

        #[test]
        fn reordering_changes_outcome() {
            let reversed: Vec<ClassificationRule> =
                CLASSIFICATION_RULES.iter().rev().copied().collect();
            assert_eq!(
                classify_with(&reversed, "Дикая магия хаоса", "chaos-icon", "traits"),
                ResourceCategory::WildShape
            );
        }

        #[test]
        fn ki_needs_more_than_the_bare_syllable() {
            assert_eq!(
                classify("Божественная интервенция", "", "traits"),
                ResourceCategory::ChannelDivinity
            );
            assert_eq!(classify("Очки ци", "", "traits"), ResourceCategory::Ki);
            assert_eq!(classify("5 очков ци", "", ""), ResourceCategory::Ki);
            assert!(!matching_categories("Интуиция", "", "").contains(&ResourceCategory::Ki));
        }

        #[test]
        fn earlier_rule_beats_location() {
            // A rage pool filed under "spells" still classifies as rage.
            assert_eq!(classify("Rage", "", "spells"), ResourceCategory::Rage);
        }
    }
}

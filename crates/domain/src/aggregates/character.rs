//! CharacterRecord aggregate - the canonical in-memory form of a player character
//!
//! # Design
//!
//! - **Private fields**: state is only reachable through accessors
//! - **Newtypes**: `CharacterName` is validated at construction
//! - **Derived values are never stored**: modifiers, proficiency bonus and
//!   total level are recomputed from base attributes on every call
//! - **Forward-only wire format**: `Serialize` writes the current shape only;
//!   reading goes through [`crate::decode::decode_character`]

use std::collections::BTreeMap;

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::entities::{
    ActiveEffect, ClassEntry, Currency, EquipmentItem, Feature, ResourceDescriptor, RestKind,
    TreasureItem,
};
use crate::game_systems::dnd5e;
use crate::ids::{CharacterId, EffectId, ResourceId};
use crate::value_objects::{Ability, AbilityScores, CharacterName, ProficiencyLevel, Skill};

/// Roleplay text blocks on the sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Personality {
    pub traits: String,
    pub ideals: String,
    pub bonds: String,
    pub flaws: String,
    pub backstory: String,
    pub notes: String,
}

/// A player character.
///
/// # Invariants
///
/// - every required field is populated; there is no partially decoded record
/// - `id` is minted once and never reassigned
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use tavernkeep_domain::{AbilityScores, CharacterName, CharacterRecord, ClassEntry};
///
/// let name = CharacterName::new("Торин").unwrap();
/// let record = CharacterRecord::new(name, AbilityScores::uniform(14), 12, Utc::now())
///     .with_class(ClassEntry::new("Barbarian", 3));
///
/// assert_eq!(record.total_level(), 3);
/// assert_eq!(record.proficiency_bonus(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRecord {
    // Identity
    pub(crate) id: CharacterId,
    pub(crate) name: CharacterName,

    // Background
    pub(crate) race: String,
    pub(crate) background: String,
    pub(crate) alignment: String,
    pub(crate) classes: Vec<ClassEntry>,
    pub(crate) experience: u32,

    // Base stats
    pub(crate) ability_scores: AbilityScores,
    pub(crate) max_hit_points: i32,
    pub(crate) current_hit_points: i32,
    pub(crate) temporary_hit_points: i32,
    pub(crate) armor_class: i32,
    pub(crate) speed: u32,
    pub(crate) inspiration: bool,
    pub(crate) skill_proficiencies: BTreeMap<Skill, ProficiencyLevel>,
    pub(crate) saving_throws: Vec<Ability>,
    pub(crate) languages: Vec<String>,

    // Collections
    pub(crate) equipment: Vec<EquipmentItem>,
    pub(crate) treasures: Vec<TreasureItem>,
    pub(crate) features: Vec<Feature>,
    pub(crate) active_effects: Vec<ActiveEffect>,
    pub(crate) resources: Vec<ResourceDescriptor>,
    pub(crate) currency: Currency,

    // Attachments and text
    pub(crate) avatar: Option<Vec<u8>>,
    pub(crate) personality: Personality,

    // Metadata
    pub(crate) date_created: DateTime<Utc>,
    pub(crate) date_modified: DateTime<Utc>,
}

impl CharacterRecord {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create a new character with a fresh identifier and every optional
    /// field at its default.
    pub fn new(
        name: CharacterName,
        ability_scores: AbilityScores,
        max_hit_points: i32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CharacterId::new(),
            name,
            race: String::new(),
            background: String::new(),
            alignment: String::new(),
            classes: Vec::new(),
            experience: 0,
            ability_scores,
            max_hit_points,
            current_hit_points: max_hit_points,
            temporary_hit_points: 0,
            armor_class: 10,
            speed: 30,
            inspiration: false,
            skill_proficiencies: BTreeMap::new(),
            saving_throws: Vec::new(),
            languages: Vec::new(),
            equipment: Vec::new(),
            treasures: Vec::new(),
            features: Vec::new(),
            active_effects: Vec::new(),
            resources: Vec::new(),
            currency: Currency::default(),
            avatar: None,
            personality: Personality::default(),
            date_created: now,
            date_modified: now,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_race(mut self, race: impl Into<String>) -> Self {
        self.race = race.into();
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    pub fn with_alignment(mut self, alignment: impl Into<String>) -> Self {
        self.alignment = alignment.into();
        self
    }

    pub fn with_class(mut self, class: ClassEntry) -> Self {
        self.classes.push(class);
        self
    }

    pub fn with_experience(mut self, experience: u32) -> Self {
        self.experience = experience;
        self
    }

    pub fn with_hit_points(mut self, current: i32, temporary: i32) -> Self {
        self.current_hit_points = current;
        self.temporary_hit_points = temporary.max(0);
        self
    }

    pub fn with_armor_class(mut self, armor_class: i32) -> Self {
        self.armor_class = armor_class;
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_inspiration(mut self, inspiration: bool) -> Self {
        self.inspiration = inspiration;
        self
    }

    pub fn with_skill(mut self, skill: Skill, level: ProficiencyLevel) -> Self {
        self.set_skill_proficiency(skill, level);
        self
    }

    pub fn with_saving_throw(mut self, ability: Ability) -> Self {
        if !self.saving_throws.contains(&ability) {
            self.saving_throws.push(ability);
        }
        self
    }

    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_equipment(mut self, equipment: Vec<EquipmentItem>) -> Self {
        self.equipment = equipment;
        self
    }

    pub fn with_treasures(mut self, treasures: Vec<TreasureItem>) -> Self {
        self.treasures = treasures;
        self
    }

    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }

    pub fn with_resources(mut self, resources: Vec<ResourceDescriptor>) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// An empty buffer clears the avatar.
    pub fn with_avatar(mut self, avatar: Vec<u8>) -> Self {
        self.avatar = (!avatar.is_empty()).then_some(avatar);
        self
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    pub fn race(&self) -> &str {
        &self.race
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn alignment(&self) -> &str {
        &self.alignment
    }

    pub fn classes(&self) -> &[ClassEntry] {
        &self.classes
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn ability_scores(&self) -> &AbilityScores {
        &self.ability_scores
    }

    pub fn max_hit_points(&self) -> i32 {
        self.max_hit_points
    }

    pub fn current_hit_points(&self) -> i32 {
        self.current_hit_points
    }

    pub fn temporary_hit_points(&self) -> i32 {
        self.temporary_hit_points
    }

    pub fn armor_class(&self) -> i32 {
        self.armor_class
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn has_inspiration(&self) -> bool {
        self.inspiration
    }

    pub fn skill_proficiencies(&self) -> &BTreeMap<Skill, ProficiencyLevel> {
        &self.skill_proficiencies
    }

    pub fn saving_throws(&self) -> &[Ability] {
        &self.saving_throws
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn equipment(&self) -> &[EquipmentItem] {
        &self.equipment
    }

    pub fn treasures(&self) -> &[TreasureItem] {
        &self.treasures
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn active_effects(&self) -> &[ActiveEffect] {
        &self.active_effects
    }

    pub fn resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn avatar(&self) -> Option<&[u8]> {
        self.avatar.as_deref()
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    pub fn date_modified(&self) -> DateTime<Utc> {
        self.date_modified
    }

    // =========================================================================
    // Derived Attributes (never stored)
    // =========================================================================

    /// Sum of class levels, at least 1.
    pub fn total_level(&self) -> u32 {
        self.classes
            .iter()
            .fold(0u32, |total, c| total.saturating_add(c.level))
            .max(1)
    }

    /// Display label for the class line, e.g. `"Wizard 3 / Fighter 2"`.
    pub fn class_summary(&self) -> String {
        self.classes
            .iter()
            .map(|c| format!("{} {}", c.name, c.level))
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// Name of the first class taken, or an empty string.
    pub fn primary_class(&self) -> &str {
        self.classes.first().map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn proficiency_bonus(&self) -> i32 {
        dnd5e::proficiency_bonus(self.total_level())
    }

    pub fn ability_modifier(&self, ability: Ability) -> i32 {
        dnd5e::ability_modifier(self.ability_scores.get(ability))
    }

    pub fn skill_proficiency(&self, skill: Skill) -> ProficiencyLevel {
        self.skill_proficiencies
            .get(&skill)
            .copied()
            .unwrap_or_default()
    }

    pub fn skill_bonus(&self, skill: Skill) -> i32 {
        self.ability_modifier(skill.ability())
            + self.skill_proficiency(skill).bonus(self.proficiency_bonus())
    }

    pub fn saving_throw_bonus(&self, ability: Ability) -> i32 {
        let proficient = if self.saving_throws.contains(&ability) {
            self.proficiency_bonus()
        } else {
            0
        };
        self.ability_modifier(ability) + proficient
    }

    pub fn initiative(&self) -> i32 {
        self.ability_modifier(Ability::Dexterity)
    }

    pub fn passive_perception(&self) -> i32 {
        10 + self.skill_bonus(Skill::Perception)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Record an edit.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.date_modified = now;
    }

    pub fn set_skill_proficiency(&mut self, skill: Skill, level: ProficiencyLevel) {
        if level == ProficiencyLevel::None {
            self.skill_proficiencies.remove(&skill);
        } else {
            self.skill_proficiencies.insert(skill, level);
        }
    }

    /// Apply damage, draining temporary hit points first.
    pub fn take_damage(&mut self, amount: i32) {
        let absorbed = amount.min(self.temporary_hit_points).max(0);
        self.temporary_hit_points -= absorbed;
        self.current_hit_points = self
            .current_hit_points
            .saturating_sub(amount.saturating_sub(absorbed).max(0))
            .max(0);
    }

    pub fn heal(&mut self, amount: i32) {
        self.current_hit_points = self
            .current_hit_points
            .saturating_add(amount.max(0))
            .min(self.max_hit_points);
    }

    pub fn add_effect(&mut self, effect: ActiveEffect) {
        self.active_effects.push(effect);
    }

    pub fn remove_effect(&mut self, id: EffectId) -> Option<ActiveEffect> {
        let index = self.active_effects.iter().position(|e| e.id == id)?;
        Some(self.active_effects.remove(index))
    }

    pub fn resource_mut(&mut self, id: ResourceId) -> Option<&mut ResourceDescriptor> {
        self.resources.iter_mut().find(|r| r.id() == id)
    }

    /// Rest: refill matching resource pools; a long rest also restores hit
    /// points and drops temporary hit points.
    pub fn rest(&mut self, kind: RestKind) {
        for resource in &mut self.resources {
            resource.recover(kind);
        }
        if kind == RestKind::Long {
            self.current_hit_points = self.max_hit_points;
            self.temporary_hit_points = 0;
        }
    }
}

// ============================================================================
// Serde Implementation
// ============================================================================

/// Current wire shape. Legacy shapes are never written.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CharacterRecordWireFormat<'a> {
    id: CharacterId,
    name: &'a str,
    race: &'a str,
    background: &'a str,
    alignment: &'a str,
    character_class: &'a str,
    classes: &'a [ClassEntry],
    experience: u32,
    ability_scores: &'a AbilityScores,
    max_hit_points: i32,
    current_hit_points: i32,
    temporary_hit_points: i32,
    armor_class: i32,
    speed: u32,
    inspiration: bool,
    skill_proficiencies: &'a BTreeMap<Skill, ProficiencyLevel>,
    saving_throws: &'a [Ability],
    languages: &'a [String],
    equipment: &'a [EquipmentItem],
    treasures: &'a [TreasureItem],
    features: &'a [Feature],
    active_effects: &'a [ActiveEffect],
    resources: &'a [ResourceDescriptor],
    currency: &'a Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,
    personality_traits: &'a str,
    ideals: &'a str,
    bonds: &'a str,
    flaws: &'a str,
    backstory: &'a str,
    notes: &'a str,
    date_created: DateTime<Utc>,
    date_modified: DateTime<Utc>,
}

impl Serialize for CharacterRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = CharacterRecordWireFormat {
            id: self.id,
            name: self.name.as_str(),
            race: &self.race,
            background: &self.background,
            alignment: &self.alignment,
            character_class: self.primary_class(),
            classes: &self.classes,
            experience: self.experience,
            ability_scores: &self.ability_scores,
            max_hit_points: self.max_hit_points,
            current_hit_points: self.current_hit_points,
            temporary_hit_points: self.temporary_hit_points,
            armor_class: self.armor_class,
            speed: self.speed,
            inspiration: self.inspiration,
            skill_proficiencies: &self.skill_proficiencies,
            saving_throws: &self.saving_throws,
            languages: &self.languages,
            equipment: &self.equipment,
            treasures: &self.treasures,
            features: &self.features,
            active_effects: &self.active_effects,
            resources: &self.resources,
            currency: &self.currency,
            avatar: self
                .avatar
                .as_ref()
                .map(|bytes| base64::engine::general_purpose::STANDARD.encode(bytes)),
            personality_traits: &self.personality.traits,
            ideals: &self.personality.ideals,
            bonds: &self.personality.bonds,
            flaws: &self.personality.flaws,
            backstory: &self.personality.backstory,
            notes: &self.personality.notes,
            date_created: self.date_created,
            date_modified: self.date_modified,
        };
        wire.serialize(serializer)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn create_test_character() -> CharacterRecord {
        let name = CharacterName::new("Торин").unwrap();
        CharacterRecord::new(name, AbilityScores::from_array([16, 14, 15, 8, 12, 10]), 30, fixed_now())
    }

    mod constructor {
        use super::*;

        #[test]
        fn new_applies_defaults() {
            let record = create_test_character();
            assert_eq!(record.name().as_str(), "Торин");
            assert_eq!(record.current_hit_points(), 30);
            assert_eq!(record.temporary_hit_points(), 0);
            assert_eq!(record.armor_class(), 10);
            assert_eq!(record.speed(), 30);
            assert!(!record.has_inspiration());
            assert!(record.classes().is_empty());
            assert_eq!(record.date_created(), record.date_modified());
        }

        #[test]
        fn identical_defaults_stay_distinguishable() {
            let a = create_test_character();
            let b = create_test_character();
            assert_ne!(a.id(), b.id());
        }
    }

    mod derived {
        use super::*;

        #[test]
        fn total_level_sums_classes() {
            let record = create_test_character()
                .with_class(ClassEntry::new("Wizard", 3))
                .with_class(ClassEntry::new("Fighter", 2));
            assert_eq!(record.total_level(), 5);
            assert_eq!(record.proficiency_bonus(), 3);
            assert_eq!(record.class_summary(), "Wizard 3 / Fighter 2");
            assert_eq!(record.primary_class(), "Wizard");
        }

        #[test]
        fn classless_character_is_level_one() {
            assert_eq!(create_test_character().total_level(), 1);
        }

        #[test]
        fn skill_and_save_bonuses() {
            let record = create_test_character()
                .with_class(ClassEntry::new("Rogue", 1))
                .with_skill(Skill::Stealth, ProficiencyLevel::Expertise)
                .with_skill(Skill::Perception, ProficiencyLevel::Proficient)
                .with_saving_throw(Ability::Dexterity);
            // DEX 14 -> +2, proficiency +2
            assert_eq!(record.skill_bonus(Skill::Stealth), 6);
            assert_eq!(record.skill_bonus(Skill::Acrobatics), 2);
            assert_eq!(record.saving_throw_bonus(Ability::Dexterity), 4);
            assert_eq!(record.saving_throw_bonus(Ability::Intelligence), -1);
            // WIS 12 -> +1, proficient +2
            assert_eq!(record.passive_perception(), 13);
            assert_eq!(record.initiative(), 2);
        }

        #[test]
        fn derived_values_follow_edits() {
            let mut record = create_test_character();
            assert_eq!(record.ability_modifier(Ability::Strength), 3);
            record.ability_scores.set(Ability::Strength, 8);
            assert_eq!(record.ability_modifier(Ability::Strength), -1);
        }

        #[test]
        fn huge_levels_and_scores_do_not_overflow() {
            let record = CharacterRecord::new(
                CharacterName::new("Extremes").unwrap(),
                AbilityScores::from_array([i32::MIN, i32::MAX, 10, 10, 10, 10]),
                10,
                fixed_now(),
            )
            .with_class(ClassEntry::new("Wizard", u32::MAX))
            .with_class(ClassEntry::new("Fighter", 1));
            assert_eq!(record.total_level(), u32::MAX);
            assert_eq!(record.proficiency_bonus(), 6);
            assert!(record.ability_modifier(Ability::Strength) < 0);
            assert!(record.initiative() > 0);
            assert!(record.passive_perception() > 0);
        }
    }

    mod mutation {
        use super::*;

        #[test]
        fn damage_drains_temporary_first() {
            let mut record = create_test_character().with_hit_points(30, 5);
            record.take_damage(8);
            assert_eq!(record.temporary_hit_points(), 0);
            assert_eq!(record.current_hit_points(), 27);
            record.take_damage(100);
            assert_eq!(record.current_hit_points(), 0);
        }

        #[test]
        fn heal_caps_at_max() {
            let mut record = create_test_character().with_hit_points(10, 0);
            record.heal(50);
            assert_eq!(record.current_hit_points(), 30);
        }

        #[test]
        fn long_rest_restores() {
            let rage = ResourceDescriptor::new("Ярость", "", "traits", 3).with_current(0);
            let rage_id = rage.id();
            let mut record = create_test_character()
                .with_hit_points(4, 3)
                .with_resources(vec![rage]);
            record.rest(RestKind::Short);
            assert_eq!(record.resource_mut(rage_id).unwrap().current_value(), 0);
            record.rest(RestKind::Long);
            assert_eq!(record.resource_mut(rage_id).unwrap().current_value(), 3);
            assert_eq!(record.current_hit_points(), 30);
            assert_eq!(record.temporary_hit_points(), 0);
        }

        #[test]
        fn effects_add_and_remove() {
            let mut record = create_test_character();
            let bless = ActiveEffect::named("Bless").with_duration(10);
            let id = bless.id;
            record.add_effect(bless);
            assert_eq!(record.active_effects().len(), 1);
            assert_eq!(record.remove_effect(id).unwrap().name, "Bless");
            assert!(record.remove_effect(id).is_none());
        }

        #[test]
        fn touch_updates_modified_only() {
            let mut record = create_test_character();
            let later = Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap();
            record.touch(later);
            assert_eq!(record.date_modified(), later);
            assert_eq!(record.date_created(), fixed_now());
        }
    }

    mod serde {
        use super::*;

        #[test]
        fn serialize_produces_current_shape() {
            let record = create_test_character()
                .with_class(ClassEntry::new("Barbarian", 2))
                .with_avatar(vec![1, 2, 3]);
            let json = serde_json::to_value(&record).unwrap();

            assert_eq!(json["characterClass"], "Barbarian");
            assert_eq!(json["abilityScores"]["strength"], 16);
            assert_eq!(json["avatar"], "AQID");
            assert!(json.get("activeEffects").is_some());
            assert!(json.get("temporaryHitPoints").is_some());
            assert!(json.get("dateModified").is_some());
            // Derived values are not persisted
            assert!(json.get("proficiencyBonus").is_none());
            assert!(json.get("level").is_none());
        }

        #[test]
        fn avatar_omitted_when_absent() {
            let json = serde_json::to_value(create_test_character()).unwrap();
            assert!(json.get("avatar").is_none());
        }
    }
}

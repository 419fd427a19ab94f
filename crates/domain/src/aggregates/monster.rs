//! MonsterRecord aggregate - a homebrew or bestiary stat block kept by the player

use serde::{Serialize, Serializer};

use crate::entities::Feature;
use crate::game_systems::dnd5e;
use crate::ids::MonsterId;
use crate::value_objects::{Ability, AbilityScores, ChallengeRating, MonsterName};

/// A monster stat block.
#[derive(Debug, Clone, PartialEq)]
pub struct MonsterRecord {
    pub(crate) id: MonsterId,
    pub(crate) name: MonsterName,
    pub(crate) size: String,
    pub(crate) creature_type: String,
    pub(crate) alignment: String,
    pub(crate) armor_class: i32,
    pub(crate) hit_points: i32,
    pub(crate) hit_dice: String,
    pub(crate) speed: String,
    pub(crate) ability_scores: AbilityScores,
    pub(crate) challenge_rating: ChallengeRating,
    pub(crate) traits: Vec<Feature>,
    pub(crate) actions: Vec<Feature>,
    pub(crate) legendary_actions: Vec<Feature>,
    pub(crate) notes: String,
}

impl MonsterRecord {
    pub fn new(name: MonsterName, ability_scores: AbilityScores, hit_points: i32) -> Self {
        Self {
            id: MonsterId::new(),
            name,
            size: "Medium".to_string(),
            creature_type: String::new(),
            alignment: String::new(),
            armor_class: 10,
            hit_points,
            hit_dice: String::new(),
            speed: "30 ft.".to_string(),
            ability_scores,
            challenge_rating: ChallengeRating::default(),
            traits: Vec::new(),
            actions: Vec::new(),
            legendary_actions: Vec::new(),
            notes: String::new(),
        }
    }

    pub fn with_challenge_rating(mut self, cr: ChallengeRating) -> Self {
        self.challenge_rating = cr;
        self
    }

    pub fn with_armor_class(mut self, armor_class: i32) -> Self {
        self.armor_class = armor_class;
        self
    }

    pub fn with_actions(mut self, actions: Vec<Feature>) -> Self {
        self.actions = actions;
        self
    }

    pub fn id(&self) -> MonsterId {
        self.id
    }

    pub fn name(&self) -> &MonsterName {
        &self.name
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn creature_type(&self) -> &str {
        &self.creature_type
    }

    pub fn alignment(&self) -> &str {
        &self.alignment
    }

    pub fn armor_class(&self) -> i32 {
        self.armor_class
    }

    pub fn hit_points(&self) -> i32 {
        self.hit_points
    }

    pub fn hit_dice(&self) -> &str {
        &self.hit_dice
    }

    pub fn speed(&self) -> &str {
        &self.speed
    }

    pub fn ability_scores(&self) -> &AbilityScores {
        &self.ability_scores
    }

    pub fn challenge_rating(&self) -> ChallengeRating {
        self.challenge_rating
    }

    pub fn traits(&self) -> &[Feature] {
        &self.traits
    }

    pub fn actions(&self) -> &[Feature] {
        &self.actions
    }

    pub fn legendary_actions(&self) -> &[Feature] {
        &self.legendary_actions
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn ability_modifier(&self, ability: Ability) -> i32 {
        dnd5e::ability_modifier(self.ability_scores.get(ability))
    }

    pub fn proficiency_bonus(&self) -> i32 {
        self.challenge_rating.proficiency_bonus()
    }

    pub fn experience(&self) -> u32 {
        self.challenge_rating.experience()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MonsterRecordWireFormat<'a> {
    id: MonsterId,
    name: &'a str,
    size: &'a str,
    creature_type: &'a str,
    alignment: &'a str,
    armor_class: i32,
    hit_points: i32,
    hit_dice: &'a str,
    speed: &'a str,
    ability_scores: &'a AbilityScores,
    challenge_rating: ChallengeRating,
    traits: &'a [Feature],
    actions: &'a [Feature],
    legendary_actions: &'a [Feature],
    notes: &'a str,
}

impl Serialize for MonsterRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        MonsterRecordWireFormat {
            id: self.id,
            name: self.name.as_str(),
            size: &self.size,
            creature_type: &self.creature_type,
            alignment: &self.alignment,
            armor_class: self.armor_class,
            hit_points: self.hit_points,
            hit_dice: &self.hit_dice,
            speed: &self.speed,
            ability_scores: &self.ability_scores,
            challenge_rating: self.challenge_rating,
            traits: &self.traits,
            actions: &self.actions,
            legendary_actions: &self.legendary_actions,
            notes: &self.notes,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goblin() -> MonsterRecord {
        MonsterRecord::new(
            MonsterName::new("Goblin").unwrap(),
            AbilityScores::from_array([8, 14, 10, 10, 8, 8]),
            7,
        )
        .with_challenge_rating(ChallengeRating::from_f64(0.25).unwrap())
        .with_armor_class(15)
    }

    #[test]
    fn derived_from_challenge_rating() {
        let monster = goblin();
        assert_eq!(monster.experience(), 50);
        assert_eq!(monster.proficiency_bonus(), 2);
        assert_eq!(monster.ability_modifier(Ability::Dexterity), 2);
    }

    #[test]
    fn serializes_rating_as_text() {
        let json = serde_json::to_value(goblin()).unwrap();
        assert_eq!(json["challengeRating"], "1/4");
        assert_eq!(json["armorClass"], 15);
        assert_eq!(json["speed"], "30 ft.");
    }
}

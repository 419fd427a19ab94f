//! Nested record elements: inventory, class levels, features, effects, coins.
//!
//! These are plain value objects with public fields. Their serde derives
//! describe the *current* wire shape; legacy shapes are handled by the
//! decoder before these types are involved.

use serde::{Deserialize, Serialize};

use crate::ids::EffectId;

fn default_quantity() -> u32 {
    1
}

fn default_class_level() -> u32 {
    1
}

fn default_hit_die() -> u32 {
    8
}

/// Broad equipment grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ItemType {
    Weapon,
    Armor,
    #[default]
    Gear,
    Tool,
    Consumable,
    Other,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Gear => "gear",
            Self::Tool => "tool",
            Self::Consumable => "consumable",
            Self::Other => "other",
        }
    }
}

impl From<String> for ItemType {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "weapon" | "оружие" => Self::Weapon,
            "armor" | "armour" | "доспех" | "доспехи" | "shield" => Self::Armor,
            "gear" | "" | "снаряжение" => Self::Gear,
            "tool" | "tools" | "инструмент" => Self::Tool,
            "consumable" | "potion" | "расходник" | "зелье" => Self::Consumable,
            _ => Self::Other,
        }
    }
}

/// One inventory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentItem {
    pub name: String,
    #[serde(default, rename = "type", alias = "itemType")]
    pub item_type: ItemType,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub equipped: bool,
    #[serde(default)]
    pub description: String,
}

impl EquipmentItem {
    /// An item with only a display name; everything else at its default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            item_type: ItemType::default(),
            cost: 0.0,
            weight: 0.0,
            quantity: default_quantity(),
            equipped: false,
            description: String::new(),
        }
    }

    pub fn with_type(mut self, item_type: ItemType) -> Self {
        self.item_type = item_type;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn total_weight(&self) -> f64 {
        self.weight * self.quantity as f64
    }
}

/// A valuable carried for its worth rather than its use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasureItem {
    pub name: String,
    /// Value in gold pieces
    #[serde(default)]
    pub value: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub description: String,
}

impl TreasureItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: 0.0,
            quantity: default_quantity(),
            description: String::new(),
        }
    }
}

/// A class, race or background feature (also used for monster traits and actions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub description: String,
}

impl Feature {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: String::new(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

/// Levels taken in one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassEntry {
    pub name: String,
    #[serde(default)]
    pub subclass: String,
    #[serde(default = "default_class_level")]
    pub level: u32,
    #[serde(default = "default_hit_die")]
    pub hit_die: u32,
}

impl ClassEntry {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            subclass: String::new(),
            level: level.max(1),
            hit_die: default_hit_die(),
        }
    }

    pub fn with_subclass(mut self, subclass: impl Into<String>) -> Self {
        self.subclass = subclass.into();
        self
    }

    pub fn with_hit_die(mut self, hit_die: u32) -> Self {
        self.hit_die = hit_die;
        self
    }
}

/// A temporary condition or buff currently applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveEffect {
    #[serde(default)]
    pub id: EffectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_rounds: Option<u32>,
    #[serde(default)]
    pub source: String,
}

impl ActiveEffect {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: EffectId::new(),
            name: name.into(),
            description: String::new(),
            remaining_rounds: None,
            source: String::new(),
        }
    }

    pub fn with_duration(mut self, rounds: u32) -> Self {
        self.remaining_rounds = Some(rounds);
        self
    }
}

/// Coin purse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Currency {
    pub cp: u32,
    pub sp: u32,
    pub ep: u32,
    pub gp: u32,
    pub pp: u32,
}

impl Currency {
    pub fn gold(gp: u32) -> Self {
        Self {
            gp,
            ..Self::default()
        }
    }

    /// Total value expressed in gold pieces.
    pub fn total_in_gold(&self) -> f64 {
        self.cp as f64 / 100.0
            + self.sp as f64 / 10.0
            + self.ep as f64 / 2.0
            + self.gp as f64
            + self.pp as f64 * 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_is_lenient() {
        let parsed: ItemType = serde_json::from_str("\"Weapon\"").unwrap();
        assert_eq!(parsed, ItemType::Weapon);
        let parsed: ItemType = serde_json::from_str("\"trinket\"").unwrap();
        assert_eq!(parsed, ItemType::Other);
        assert_eq!(serde_json::to_string(&ItemType::Armor).unwrap(), "\"armor\"");
    }

    #[test]
    fn equipment_defaults_from_minimal_object() {
        let item: EquipmentItem = serde_json::from_str(r#"{"name":"Rope"}"#).unwrap();
        assert_eq!(item, EquipmentItem::named("Rope"));
    }

    #[test]
    fn equipment_requires_name() {
        let item: Result<EquipmentItem, _> = serde_json::from_str(r#"{"type":"weapon"}"#);
        assert!(item.is_err());
    }

    #[test]
    fn class_entry_defaults() {
        let entry: ClassEntry = serde_json::from_str(r#"{"name":"Wizard"}"#).unwrap();
        assert_eq!(entry.level, 1);
        assert_eq!(entry.hit_die, 8);
        assert_eq!(ClassEntry::new("Fighter", 0).level, 1);
    }

    #[test]
    fn currency_totals() {
        let purse = Currency {
            cp: 50,
            sp: 5,
            ep: 2,
            gp: 3,
            pp: 1,
        };
        assert!((purse.total_in_gold() - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_weight_scales_by_quantity() {
        let mut arrows = EquipmentItem::named("Arrows");
        arrows.weight = 0.05;
        arrows.quantity = 20;
        assert!((arrows.total_weight() - 1.0).abs() < 1e-9);
    }
}

//! Monster field schemas and the `decode_monster` entry point.

use serde_json::Value;

use super::abilities::ABILITY_SCORES;
use super::error::DecodeError;
use super::schema::{Absent, Decoder, FieldSchema, ShapeError, ShapeResult, ShapeRule};
use super::shapes::{empty, features, integer, integer_text, text, TEXT};
use super::{DecodeContext, Decoded};
use crate::aggregates::MonsterRecord;
use crate::entities::Feature;
use crate::ids::MonsterId;
use crate::value_objects::{ChallengeRating, MonsterName};

/// Decode an untyped document into a [`MonsterRecord`].
pub fn decode_monster(
    document: &Value,
    context: &DecodeContext,
) -> Result<Decoded<MonsterRecord>, DecodeError> {
    let doc = document.as_object().ok_or(DecodeError::NotAnObject)?;
    let mut d = Decoder::new(context);

    let name = d.field(doc, &NAME)?;
    let ability_scores = d.field(doc, &ABILITY_SCORES)?;
    let hit_points = d.field(doc, &HIT_POINTS)?;

    let record = MonsterRecord {
        id: d.field(doc, &ID)?,
        name,
        size: d.field(doc, &SIZE)?,
        creature_type: d.field(doc, &CREATURE_TYPE)?,
        alignment: d.field(doc, &ALIGNMENT)?,
        armor_class: d.field(doc, &ARMOR_CLASS)?,
        hit_points,
        hit_dice: d.field(doc, &HIT_DICE)?,
        speed: d.field(doc, &SPEED)?,
        ability_scores,
        challenge_rating: d.field(doc, &CHALLENGE_RATING)?,
        traits: d.field(doc, &TRAITS)?,
        actions: d.field(doc, &ACTIONS)?,
        legendary_actions: d.field(doc, &LEGENDARY_ACTIONS)?,
        notes: d.field(doc, &NOTES)?,
    };
    Ok(d.finish(record))
}

static ID: FieldSchema<MonsterId> = FieldSchema {
    field: "id",
    aliases: &[],
    shapes: &[ShapeRule::current("uuid", Value::is_string, monster_id)],
    absent: Absent::Default(mint_id),
};

fn monster_id(value: &Value, _: &mut Decoder) -> ShapeResult<MonsterId> {
    value
        .as_str()
        .and_then(|s| s.trim().parse().ok())
        .ok_or(ShapeError::Mismatch)
}

fn mint_id(_: &Decoder) -> MonsterId {
    MonsterId::new()
}

static NAME: FieldSchema<MonsterName> = FieldSchema {
    field: "name",
    aliases: &[],
    shapes: &[ShapeRule::current("string", Value::is_string, monster_name)],
    absent: Absent::Required,
};

fn monster_name(value: &Value, _: &mut Decoder) -> ShapeResult<MonsterName> {
    let raw = value.as_str().ok_or(ShapeError::Mismatch)?;
    if raw.trim().is_empty() {
        return Err(DecodeError::missing("name").into());
    }
    MonsterName::new(raw).map_err(|_| ShapeError::Mismatch)
}

static SIZE: FieldSchema<String> = FieldSchema {
    field: "size",
    aliases: &[],
    shapes: TEXT,
    absent: Absent::Default(medium),
};

fn medium(_: &Decoder) -> String {
    "Medium".to_string()
}

static CREATURE_TYPE: FieldSchema<String> = FieldSchema {
    field: "creatureType",
    aliases: &["type"],
    shapes: TEXT,
    absent: Absent::Default(empty),
};

static ALIGNMENT: FieldSchema<String> = FieldSchema {
    field: "alignment",
    aliases: &[],
    shapes: TEXT,
    absent: Absent::Default(empty),
};

static HIT_DICE: FieldSchema<String> = FieldSchema {
    field: "hitDice",
    aliases: &[],
    shapes: TEXT,
    absent: Absent::Default(empty),
};

static NOTES: FieldSchema<String> = FieldSchema {
    field: "notes",
    aliases: &["description"],
    shapes: TEXT,
    absent: Absent::Default(empty),
};

static ARMOR_CLASS: FieldSchema<i32> = FieldSchema {
    field: "armorClass",
    aliases: &["ac"],
    shapes: &[
        ShapeRule::current("number", Value::is_number, integer::<i32>),
        ShapeRule::legacy("numeric-text", Value::is_string, integer_text::<i32>),
    ],
    absent: Absent::Default(ten),
};

fn ten(_: &Decoder) -> i32 {
    10
}

static HIT_POINTS: FieldSchema<i32> = FieldSchema {
    field: "hitPoints",
    aliases: &["hp"],
    shapes: &[
        ShapeRule::current("number", Value::is_number, integer::<i32>),
        ShapeRule::legacy("numeric-text", Value::is_string, integer_text::<i32>),
    ],
    absent: Absent::Required,
};

static SPEED: FieldSchema<String> = FieldSchema {
    field: "speed",
    aliases: &[],
    shapes: &[
        ShapeRule::current("text", Value::is_string, text),
        ShapeRule::legacy("feet", Value::is_number, speed_in_feet),
    ],
    absent: Absent::Default(thirty_feet),
};

fn speed_in_feet(value: &Value, d: &mut Decoder) -> ShapeResult<String> {
    integer::<u32>(value, d).map(|feet| format!("{} ft.", feet))
}

fn thirty_feet(_: &Decoder) -> String {
    "30 ft.".to_string()
}

static CHALLENGE_RATING: FieldSchema<ChallengeRating> = FieldSchema {
    field: "challengeRating",
    aliases: &["cr"],
    shapes: &[
        ShapeRule::current("fraction-text", Value::is_string, rating_text),
        ShapeRule::legacy("number", Value::is_number, rating_number),
    ],
    absent: Absent::Default(empty),
};

fn rating_text(value: &Value, _: &mut Decoder) -> ShapeResult<ChallengeRating> {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or(ShapeError::Mismatch)
}

fn rating_number(value: &Value, _: &mut Decoder) -> ShapeResult<ChallengeRating> {
    value
        .as_f64()
        .and_then(|n| ChallengeRating::from_f64(n).ok())
        .ok_or(ShapeError::Mismatch)
}

macro_rules! feature_field {
    ($schema:ident, $field:literal, $list:ident) => {
        static $schema: FieldSchema<Vec<Feature>> = FieldSchema {
            field: $field,
            aliases: &[],
            shapes: &[ShapeRule::current("feature-list", Value::is_array, $list)],
            absent: Absent::Default(empty),
        };

        fn $list(value: &Value, d: &mut Decoder) -> ShapeResult<Vec<Feature>> {
            features($field, value, d)
        }
    };
}

feature_field!(TRAITS, "traits", trait_list);
feature_field!(ACTIONS, "actions", action_list);
feature_field!(LEGENDARY_ACTIONS, "legendaryActions", legendary_action_list);

//! Ability score block, shared by characters and monsters.

use serde_json::{Map, Value};

use super::error::{DecodeError, DecodeIssue};
use super::schema::{Absent, CollectionPolicy, Decoder, FieldSchema, ShapeError, ShapeResult, ShapeRule};
use super::shapes::{integer, integer_text};
use crate::value_objects::{Ability, AbilityScores};

const FIELD: &str = "abilityScores";

/// Field paths reported when one score is missing, in [`Ability::ALL`] order.
const SCORE_PATHS: [&str; 6] = [
    "abilityScores.strength",
    "abilityScores.dexterity",
    "abilityScores.constitution",
    "abilityScores.intelligence",
    "abilityScores.wisdom",
    "abilityScores.charisma",
];

pub(super) static ABILITY_SCORES: FieldSchema<AbilityScores> = FieldSchema {
    field: FIELD,
    aliases: &["abilities", "stats"],
    shapes: &[
        ShapeRule::current("ability-map", Value::is_object, ability_map),
        ShapeRule::legacy("score-array", Value::is_array, score_array),
    ],
    absent: Absent::Derive(flattened_scores),
};

const SCORE: &[ShapeRule<i32>] = &[
    ShapeRule::current("number", Value::is_number, integer::<i32>),
    ShapeRule::legacy("numeric-text", Value::is_string, integer_text::<i32>),
    ShapeRule::legacy("score-object", Value::is_object, score_object),
];

/// `{ "score": 15 }` or `{ "value": 15 }`
fn score_object(value: &Value, decoder: &mut Decoder) -> ShapeResult<i32> {
    let inner = value
        .get("score")
        .or_else(|| value.get("value"))
        .ok_or(ShapeError::Mismatch)?;
    decoder.apply(FIELD, &SCORE[..2], inner)
}

/// Keys may be full names (`strength`) or abbreviations (`str`).
fn ability_map(value: &Value, decoder: &mut Decoder) -> ShapeResult<AbilityScores> {
    let map = value.as_object().ok_or(ShapeError::Mismatch)?;
    let mut scores = AbilityScores::default();
    for ability in Ability::ALL {
        let raw = [ability.key(), ability.abbreviation()]
            .into_iter()
            .filter_map(|key| map.get(key))
            .find(|v| !v.is_null())
            .ok_or_else(|| DecodeError::missing(SCORE_PATHS[ability.index()]))?;
        let score = decoder
            .apply(FIELD, SCORE, raw)
            .map_err(|_| DecodeError::malformed(FIELD, ability.index()))?;
        scores.set(ability, score);
    }
    Ok(scores)
}

/// Six scores in sheet order. Fail-fast on any bad element.
fn score_array(value: &Value, decoder: &mut Decoder) -> ShapeResult<AbilityScores> {
    let items = value.as_array().ok_or(ShapeError::Mismatch)?;
    if items.len() > SCORE_PATHS.len() {
        return Err(DecodeError::malformed(FIELD, SCORE_PATHS.len()).into());
    }
    let scores = decoder.list(FIELD, items, CollectionPolicy::FailFast, SCORE)?;
    let scores: [i32; 6] = scores
        .try_into()
        .map_err(|partial: Vec<i32>| DecodeError::missing(SCORE_PATHS[partial.len()]))?;
    Ok(AbilityScores::from_array(scores))
}

/// Oldest documents kept `strength`..`charisma` at the top level.
fn flattened_scores(
    document: &Map<String, Value>,
    decoder: &mut Decoder,
) -> Result<AbilityScores, DecodeError> {
    let flattened: Map<String, Value> = Ability::ALL
        .iter()
        .filter_map(|ability| {
            document
                .get(ability.key())
                .map(|value| (ability.key().to_string(), value.clone()))
        })
        .collect();
    if flattened.is_empty() {
        return Err(DecodeError::missing(FIELD));
    }
    let scores = ability_map(&Value::Object(flattened), decoder).map_err(|err| match err {
        ShapeError::Mismatch => DecodeError::unrecognized(FIELD),
        ShapeError::Fatal(fatal) => fatal,
    })?;
    decoder.note(DecodeIssue::LegacyShape {
        field: FIELD,
        rule: "flattened-keys",
    });
    Ok(scores)
}

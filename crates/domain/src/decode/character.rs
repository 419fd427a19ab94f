//! Character field schemas and the `decode_character` entry point.
//!
//! Every field of [`CharacterRecord`] has exactly one schema below. The
//! schema is the whole migration story for that field: where it may live,
//! which shapes are accepted in which order, and what happens when it is
//! missing.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::abilities::ABILITY_SCORES;
use super::error::{DecodeError, DecodeIssue};
use super::schema::{
    Absent, CollectionPolicy, Decoder, FieldSchema, ShapeError, ShapeResult, ShapeRule,
};
use super::shapes::{
    boolean, empty, features, integer, integer_text, leading_integer, lines, loose_flag, non_blank, now,
    object, some_integer, some_integer_text, BINARY, OPTIONAL_TIMESTAMP, TEXT, TIMESTAMP,
};
use super::{coerce, DecodeContext, Decoded};
use crate::aggregates::{CharacterRecord, Personality};
use crate::entities::{
    ActiveEffect, ClassEntry, Currency, EquipmentItem, Feature, ResourceDescriptor, TreasureItem,
};
use crate::ids::CharacterId;
use crate::value_objects::{Ability, CharacterName, ProficiencyLevel, Skill};

/// Decode an untyped document into a [`CharacterRecord`].
///
/// Required fields are resolved first, so the reported error names the
/// first field that has no safe default.
pub fn decode_character(
    document: &Value,
    context: &DecodeContext,
) -> Result<Decoded<CharacterRecord>, DecodeError> {
    let doc = document.as_object().ok_or(DecodeError::NotAnObject)?;
    let mut d = Decoder::new(context);

    let name = d.field(doc, &NAME)?;
    let ability_scores = d.field(doc, &ABILITY_SCORES)?;
    let max_hit_points = d.field(doc, &MAX_HIT_POINTS)?;

    let id = d.field(doc, &ID)?;
    let classes = d.field(doc, &CLASSES)?;
    let current_hit_points = d.field(doc, &CURRENT_HIT_POINTS)?.unwrap_or(max_hit_points);
    let date_created = d.field(doc, &DATE_CREATED)?;
    let date_modified = d.field(doc, &DATE_MODIFIED)?.unwrap_or(date_created);

    let record = CharacterRecord {
        id,
        name,
        race: d.field(doc, &RACE)?,
        background: d.field(doc, &BACKGROUND)?,
        alignment: d.field(doc, &ALIGNMENT)?,
        classes,
        experience: d.field(doc, &EXPERIENCE)?,
        ability_scores,
        max_hit_points,
        current_hit_points,
        temporary_hit_points: d.field(doc, &TEMPORARY_HIT_POINTS)?,
        armor_class: d.field(doc, &ARMOR_CLASS)?,
        speed: d.field(doc, &SPEED)?,
        inspiration: d.field(doc, &INSPIRATION)?,
        skill_proficiencies: d.field(doc, &SKILL_PROFICIENCIES)?,
        saving_throws: d.field(doc, &SAVING_THROWS)?,
        languages: d.field(doc, &LANGUAGES)?,
        equipment: d.field(doc, &EQUIPMENT)?,
        treasures: d.field(doc, &TREASURES)?,
        features: d.field(doc, &FEATURES)?,
        active_effects: d.field(doc, &ACTIVE_EFFECTS)?,
        resources: d.field(doc, &RESOURCES)?,
        currency: d.field(doc, &CURRENCY)?,
        avatar: d.binary(doc, &AVATAR),
        personality: Personality {
            traits: d.field(doc, &PERSONALITY_TRAITS)?,
            ideals: d.field(doc, &IDEALS)?,
            bonds: d.field(doc, &BONDS)?,
            flaws: d.field(doc, &FLAWS)?,
            backstory: d.field(doc, &BACKSTORY)?,
            notes: d.field(doc, &NOTES)?,
        },
        date_created,
        date_modified,
    };
    Ok(d.finish(record))
}

// ============================================================================
// Identity
// ============================================================================

static ID: FieldSchema<CharacterId> = FieldSchema {
    field: "id",
    aliases: &[],
    shapes: &[
        ShapeRule::current("uuid", Value::is_string, character_id),
        ShapeRule::legacy("foreign-id", is_scalar, replacement_id),
    ],
    absent: Absent::Default(mint_id),
};

fn is_scalar(value: &Value) -> bool {
    value.is_string() || value.is_number()
}

fn character_id(value: &Value, _: &mut Decoder) -> ShapeResult<CharacterId> {
    value
        .as_str()
        .and_then(|s| s.trim().parse().ok())
        .ok_or(ShapeError::Mismatch)
}

fn mint_id(_: &Decoder) -> CharacterId {
    CharacterId::new()
}

/// Ids from other tools are not UUIDs; the record gets a fresh one.
fn replacement_id(_: &Value, _: &mut Decoder) -> ShapeResult<CharacterId> {
    Ok(CharacterId::new())
}

static NAME: FieldSchema<CharacterName> = FieldSchema {
    field: "name",
    aliases: &["characterName"],
    shapes: &[ShapeRule::current("string", Value::is_string, character_name)],
    absent: Absent::Required,
};

/// A blank name carries no information and counts as missing.
fn character_name(value: &Value, _: &mut Decoder) -> ShapeResult<CharacterName> {
    let raw = value.as_str().ok_or(ShapeError::Mismatch)?;
    if raw.trim().is_empty() {
        return Err(DecodeError::missing("name").into());
    }
    CharacterName::new(raw).map_err(|_| ShapeError::Mismatch)
}

// ============================================================================
// Background text
// ============================================================================

macro_rules! text_field {
    ($schema:ident, $field:literal $(, $alias:literal)*) => {
        static $schema: FieldSchema<String> = FieldSchema {
            field: $field,
            aliases: &[$($alias),*],
            shapes: TEXT,
            absent: Absent::Default(empty),
        };
    };
}

text_field!(RACE, "race");
text_field!(BACKGROUND, "background");
text_field!(ALIGNMENT, "alignment");
text_field!(PERSONALITY_TRAITS, "personalityTraits", "traits");
text_field!(IDEALS, "ideals");
text_field!(BONDS, "bonds");
text_field!(FLAWS, "flaws");
text_field!(BACKSTORY, "backstory", "biography");
text_field!(NOTES, "notes");

// ============================================================================
// Classes
// ============================================================================

static CLASSES: FieldSchema<Vec<ClassEntry>> = FieldSchema {
    field: "classes",
    aliases: &[],
    shapes: &[
        ShapeRule::current("class-list", Value::is_array, class_list),
        ShapeRule::legacy("single-class", Value::is_object, single_class),
    ],
    absent: Absent::Derive(classes_from_legacy_fields),
};

const CLASS_ELEMENT: &[ShapeRule<ClassEntry>] = &[
    ShapeRule::current("object", Value::is_object, class_object),
    ShapeRule::legacy("name", Value::is_string, class_named),
];

fn class_list(value: &Value, d: &mut Decoder) -> ShapeResult<Vec<ClassEntry>> {
    let items = value.as_array().ok_or(ShapeError::Mismatch)?;
    Ok(d.list("classes", items, CollectionPolicy::FailFast, CLASS_ELEMENT)?)
}

fn single_class(value: &Value, d: &mut Decoder) -> ShapeResult<Vec<ClassEntry>> {
    Ok(d.list(
        "classes",
        std::iter::once(value),
        CollectionPolicy::FailFast,
        CLASS_ELEMENT,
    )?)
}

fn class_object(value: &Value, _: &mut Decoder) -> ShapeResult<ClassEntry> {
    let mut entry: ClassEntry = object(value)?;
    non_blank(&entry.name)?;
    entry.level = entry.level.max(1);
    Ok(entry)
}

fn class_named(value: &Value, _: &mut Decoder) -> ShapeResult<ClassEntry> {
    let name = coerce::text(value).ok_or(ShapeError::Mismatch)?;
    Ok(ClassEntry::new(name, 1))
}

static LEGACY_LEVEL: FieldSchema<u32> = FieldSchema {
    field: "level",
    aliases: &[],
    shapes: &[
        ShapeRule::current("number", Value::is_number, integer::<u32>),
        ShapeRule::legacy("numeric-text", Value::is_string, integer_text::<u32>),
    ],
    absent: Absent::Default(one),
};

text_field!(LEGACY_SUBCLASS, "subclass", "archetype");

fn one(_: &Decoder) -> u32 {
    1
}

/// Single-class documents stored `characterClass`, `level` and `subclass`
/// at the top level.
fn classes_from_legacy_fields(
    doc: &Map<String, Value>,
    d: &mut Decoder,
) -> Result<Vec<ClassEntry>, DecodeError> {
    let Some(name) = doc.get("characterClass").and_then(coerce::text) else {
        return Ok(Vec::new());
    };
    let level = d.field(doc, &LEGACY_LEVEL)?;
    let subclass = d.field(doc, &LEGACY_SUBCLASS)?;
    d.note(DecodeIssue::LegacyShape {
        field: "classes",
        rule: "characterClass",
    });
    Ok(vec![ClassEntry::new(name, level).with_subclass(subclass)])
}

// ============================================================================
// Numeric stats
// ============================================================================

static EXPERIENCE: FieldSchema<u32> = FieldSchema {
    field: "experience",
    aliases: &["xp", "experiencePoints"],
    shapes: &[
        ShapeRule::current("number", Value::is_number, integer::<u32>),
        ShapeRule::legacy("numeric-text", Value::is_string, integer_text::<u32>),
    ],
    absent: Absent::Default(empty),
};

static MAX_HIT_POINTS: FieldSchema<i32> = FieldSchema {
    field: "maxHitPoints",
    aliases: &["hitPointsMax", "maxHp", "hitPoints"],
    shapes: &[
        ShapeRule::current("number", Value::is_number, integer::<i32>),
        ShapeRule::legacy("numeric-text", Value::is_string, integer_text::<i32>),
        ShapeRule::legacy("hit-point-object", Value::is_object, hit_point_max),
    ],
    absent: Absent::Required,
};

/// `{ "max": 30, "current": 12 }`
fn hit_point_max(value: &Value, _: &mut Decoder) -> ShapeResult<i32> {
    value
        .get("max")
        .and_then(coerce::loose_integer)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or(ShapeError::Mismatch)
}

static CURRENT_HIT_POINTS: FieldSchema<Option<i32>> = FieldSchema {
    field: "currentHitPoints",
    aliases: &["hp"],
    shapes: &[
        ShapeRule::current("number", Value::is_number, some_integer::<i32>),
        ShapeRule::legacy("numeric-text", Value::is_string, some_integer_text::<i32>),
    ],
    absent: Absent::Derive(current_from_hit_point_object),
};

fn current_from_hit_point_object(
    doc: &Map<String, Value>,
    _: &mut Decoder,
) -> Result<Option<i32>, DecodeError> {
    Ok(doc
        .get("hitPoints")
        .and_then(|hp| hp.get("current"))
        .and_then(coerce::loose_integer)
        .and_then(|n| i32::try_from(n).ok()))
}

static TEMPORARY_HIT_POINTS: FieldSchema<i32> = FieldSchema {
    field: "temporaryHitPoints",
    aliases: &["tempHitPoints"],
    shapes: &[
        ShapeRule::current("number", Value::is_number, integer::<i32>),
        ShapeRule::legacy("numeric-text", Value::is_string, integer_text::<i32>),
    ],
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

static SPEED: FieldSchema<u32> = FieldSchema {
    field: "speed",
    aliases: &[],
    shapes: &[
        ShapeRule::current("number", Value::is_number, integer::<u32>),
        ShapeRule::legacy("distance-text", Value::is_string, leading_integer::<u32>),
    ],
    absent: Absent::Default(thirty),
};

fn thirty(_: &Decoder) -> u32 {
    30
}

static INSPIRATION: FieldSchema<bool> = FieldSchema {
    field: "inspiration",
    aliases: &[],
    shapes: &[
        ShapeRule::current("bool", Value::is_boolean, boolean),
        ShapeRule::legacy("number", Value::is_number, loose_flag),
        ShapeRule::legacy("text", Value::is_string, loose_flag),
    ],
    absent: Absent::Default(empty),
};

// ============================================================================
// Proficiencies
// ============================================================================

type SkillMap = BTreeMap<Skill, ProficiencyLevel>;

static SKILL_PROFICIENCIES: FieldSchema<SkillMap> = FieldSchema {
    field: "skillProficiencies",
    aliases: &["skills"],
    shapes: &[
        ShapeRule::current("level-map", Value::is_object, skill_map),
        ShapeRule::legacy("name-list", Value::is_array, skill_list),
    ],
    absent: Absent::Default(empty),
};

/// Entries are independent; a bad key or level drops only that entry.
fn skill_map(value: &Value, d: &mut Decoder) -> ShapeResult<SkillMap> {
    let map = value.as_object().ok_or(ShapeError::Mismatch)?;
    let mut skills = SkillMap::new();
    for (index, (key, level)) in map.iter().enumerate() {
        match (Skill::from_name(key), proficiency_level(level)) {
            (Some(skill), Some(level)) => {
                skills.insert(skill, level);
            }
            _ => d.note(DecodeIssue::MalformedElement {
                collection: "skillProficiencies",
                index,
            }),
        }
    }
    Ok(skills)
}

/// `"expertise"`, a 0/1/2 rank, or a bare flag.
fn proficiency_level(value: &Value) -> Option<ProficiencyLevel> {
    match value {
        Value::String(s) => ProficiencyLevel::from_name(s),
        Value::Bool(true) => Some(ProficiencyLevel::Proficient),
        Value::Bool(false) => Some(ProficiencyLevel::None),
        Value::Number(_) => coerce::integer(value).and_then(ProficiencyLevel::from_rank),
        _ => None,
    }
}

const SKILL_NAME: &[ShapeRule<Skill>] =
    &[ShapeRule::current("name", Value::is_string, skill_named)];

fn skill_named(value: &Value, _: &mut Decoder) -> ShapeResult<Skill> {
    value
        .as_str()
        .and_then(Skill::from_name)
        .ok_or(ShapeError::Mismatch)
}

/// A plain list of proficient skill names.
fn skill_list(value: &Value, d: &mut Decoder) -> ShapeResult<SkillMap> {
    let items = value.as_array().ok_or(ShapeError::Mismatch)?;
    let skills = d.list(
        "skillProficiencies",
        items,
        CollectionPolicy::DropTolerant,
        SKILL_NAME,
    )?;
    Ok(skills
        .into_iter()
        .map(|skill| (skill, ProficiencyLevel::Proficient))
        .collect())
}

static SAVING_THROWS: FieldSchema<Vec<Ability>> = FieldSchema {
    field: "savingThrows",
    aliases: &[],
    shapes: &[
        ShapeRule::current("ability-list", Value::is_array, saving_throw_list),
        ShapeRule::legacy("flag-map", Value::is_object, saving_throw_flags),
    ],
    absent: Absent::Default(empty),
};

const ABILITY_NAME: &[ShapeRule<Ability>] =
    &[ShapeRule::current("name", Value::is_string, ability_named)];

fn ability_named(value: &Value, _: &mut Decoder) -> ShapeResult<Ability> {
    value
        .as_str()
        .and_then(Ability::from_name)
        .ok_or(ShapeError::Mismatch)
}

fn saving_throw_list(value: &Value, d: &mut Decoder) -> ShapeResult<Vec<Ability>> {
    let items = value.as_array().ok_or(ShapeError::Mismatch)?;
    let abilities = d.list(
        "savingThrows",
        items,
        CollectionPolicy::DropTolerant,
        ABILITY_NAME,
    )?;
    Ok(dedup(abilities))
}

/// `{ "str": true, "dex": false, ... }`
fn saving_throw_flags(value: &Value, d: &mut Decoder) -> ShapeResult<Vec<Ability>> {
    let map = value.as_object().ok_or(ShapeError::Mismatch)?;
    let mut abilities = Vec::new();
    for (index, (key, flag)) in map.iter().enumerate() {
        match (Ability::from_name(key), coerce::flag(flag)) {
            (Some(ability), Some(true)) => abilities.push(ability),
            (Some(_), Some(false)) => {}
            _ => d.note(DecodeIssue::MalformedElement {
                collection: "savingThrows",
                index,
            }),
        }
    }
    abilities.sort();
    Ok(dedup(abilities))
}

fn dedup(abilities: Vec<Ability>) -> Vec<Ability> {
    let mut seen = Vec::with_capacity(abilities.len());
    for ability in abilities {
        if !seen.contains(&ability) {
            seen.push(ability);
        }
    }
    seen
}

static LANGUAGES: FieldSchema<Vec<String>> = FieldSchema {
    field: "languages",
    aliases: &[],
    shapes: &[
        ShapeRule::current("string-list", Value::is_array, language_list),
        ShapeRule::legacy("comma-separated", Value::is_string, language_text),
    ],
    absent: Absent::Default(empty),
};

const LANGUAGE: &[ShapeRule<String>] =
    &[ShapeRule::current("string", Value::is_string, language_named)];

fn language_named(value: &Value, _: &mut Decoder) -> ShapeResult<String> {
    coerce::text(value)
        .map(str::to_string)
        .ok_or(ShapeError::Mismatch)
}

fn language_list(value: &Value, d: &mut Decoder) -> ShapeResult<Vec<String>> {
    let items = value.as_array().ok_or(ShapeError::Mismatch)?;
    Ok(d.list("languages", items, CollectionPolicy::DropTolerant, LANGUAGE)?)
}

fn language_text(value: &Value, _: &mut Decoder) -> ShapeResult<Vec<String>> {
    let text = value.as_str().ok_or(ShapeError::Mismatch)?;
    Ok(text
        .split([',', ';', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

// ============================================================================
// Inventory and features
// ============================================================================

static EQUIPMENT: FieldSchema<Vec<EquipmentItem>> = FieldSchema {
    field: "equipment",
    aliases: &[],
    shapes: &[
        ShapeRule::current("item-list", Value::is_array, equipment_list),
        ShapeRule::legacy("free-text", Value::is_string, equipment_text),
    ],
    absent: Absent::Default(empty),
};

const EQUIPMENT_ELEMENT: &[ShapeRule<EquipmentItem>] = &[
    ShapeRule::current("object", Value::is_object, equipment_object),
    ShapeRule::legacy("name", Value::is_string, equipment_named),
];

fn equipment_list(value: &Value, d: &mut Decoder) -> ShapeResult<Vec<EquipmentItem>> {
    let items = value.as_array().ok_or(ShapeError::Mismatch)?;
    Ok(d.list("equipment", items, CollectionPolicy::DropTolerant, EQUIPMENT_ELEMENT)?)
}

fn equipment_text(value: &Value, _: &mut Decoder) -> ShapeResult<Vec<EquipmentItem>> {
    let text = value.as_str().ok_or(ShapeError::Mismatch)?;
    Ok(lines(text).map(EquipmentItem::named).collect())
}

fn equipment_object(value: &Value, _: &mut Decoder) -> ShapeResult<EquipmentItem> {
    let item: EquipmentItem = object(value)?;
    non_blank(&item.name)?;
    Ok(item)
}

fn equipment_named(value: &Value, _: &mut Decoder) -> ShapeResult<EquipmentItem> {
    coerce::text(value)
        .map(EquipmentItem::named)
        .ok_or(ShapeError::Mismatch)
}

static TREASURES: FieldSchema<Vec<TreasureItem>> = FieldSchema {
    field: "treasures",
    aliases: &["treasure"],
    shapes: &[
        ShapeRule::current("item-list", Value::is_array, treasure_list),
        ShapeRule::legacy("free-text", Value::is_string, treasure_text),
    ],
    absent: Absent::Default(empty),
};

const TREASURE_ELEMENT: &[ShapeRule<TreasureItem>] = &[
    ShapeRule::current("object", Value::is_object, treasure_object),
    ShapeRule::legacy("name", Value::is_string, treasure_named),
];

fn treasure_list(value: &Value, d: &mut Decoder) -> ShapeResult<Vec<TreasureItem>> {
    let items = value.as_array().ok_or(ShapeError::Mismatch)?;
    Ok(d.list("treasures", items, CollectionPolicy::DropTolerant, TREASURE_ELEMENT)?)
}

fn treasure_text(value: &Value, _: &mut Decoder) -> ShapeResult<Vec<TreasureItem>> {
    let text = value.as_str().ok_or(ShapeError::Mismatch)?;
    Ok(lines(text).map(TreasureItem::named).collect())
}

fn treasure_object(value: &Value, _: &mut Decoder) -> ShapeResult<TreasureItem> {
    let item: TreasureItem = object(value)?;
    non_blank(&item.name)?;
    Ok(item)
}

fn treasure_named(value: &Value, _: &mut Decoder) -> ShapeResult<TreasureItem> {
    coerce::text(value)
        .map(TreasureItem::named)
        .ok_or(ShapeError::Mismatch)
}

static FEATURES: FieldSchema<Vec<Feature>> = FieldSchema {
    field: "features",
    aliases: &["featuresAndTraits"],
    shapes: &[
        ShapeRule::current("feature-list", Value::is_array, feature_list),
        ShapeRule::legacy("free-text", Value::is_string, feature_text),
    ],
    absent: Absent::Default(empty),
};

fn feature_list(value: &Value, d: &mut Decoder) -> ShapeResult<Vec<Feature>> {
    features("features", value, d)
}

fn feature_text(value: &Value, _: &mut Decoder) -> ShapeResult<Vec<Feature>> {
    let text = value.as_str().ok_or(ShapeError::Mismatch)?;
    Ok(lines(text).map(Feature::named).collect())
}

static ACTIVE_EFFECTS: FieldSchema<Vec<ActiveEffect>> = FieldSchema {
    field: "activeEffects",
    aliases: &["effects"],
    shapes: &[ShapeRule::current("effect-list", Value::is_array, effect_list)],
    absent: Absent::Default(empty),
};

const EFFECT_ELEMENT: &[ShapeRule<ActiveEffect>] = &[
    ShapeRule::current("object", Value::is_object, effect_object),
    ShapeRule::legacy("name", Value::is_string, effect_named),
];

fn effect_list(value: &Value, d: &mut Decoder) -> ShapeResult<Vec<ActiveEffect>> {
    let items = value.as_array().ok_or(ShapeError::Mismatch)?;
    Ok(d.list("activeEffects", items, CollectionPolicy::DropTolerant, EFFECT_ELEMENT)?)
}

fn effect_object(value: &Value, _: &mut Decoder) -> ShapeResult<ActiveEffect> {
    let effect: ActiveEffect = object(value)?;
    non_blank(&effect.name)?;
    Ok(effect)
}

fn effect_named(value: &Value, _: &mut Decoder) -> ShapeResult<ActiveEffect> {
    coerce::text(value)
        .map(ActiveEffect::named)
        .ok_or(ShapeError::Mismatch)
}

static RESOURCES: FieldSchema<Vec<ResourceDescriptor>> = FieldSchema {
    field: "resources",
    aliases: &[],
    shapes: &[
        ShapeRule::current("descriptor-list", Value::is_array, resource_list),
        ShapeRule::legacy("keyed-map", Value::is_object, resource_map),
    ],
    absent: Absent::Default(empty),
};

const RESOURCE_ELEMENT: &[ShapeRule<ResourceDescriptor>] =
    &[ShapeRule::current("object", Value::is_object, resource_object)];

fn resource_list(value: &Value, d: &mut Decoder) -> ShapeResult<Vec<ResourceDescriptor>> {
    let items = value.as_array().ok_or(ShapeError::Mismatch)?;
    Ok(d.list("resources", items, CollectionPolicy::DropTolerant, RESOURCE_ELEMENT)?)
}

/// Older sheets keyed descriptors by id: `{ "<id>": { ... } }`.
fn resource_map(value: &Value, d: &mut Decoder) -> ShapeResult<Vec<ResourceDescriptor>> {
    let map = value.as_object().ok_or(ShapeError::Mismatch)?;
    Ok(d.list(
        "resources",
        map.values(),
        CollectionPolicy::DropTolerant,
        RESOURCE_ELEMENT,
    )?)
}

fn resource_object(value: &Value, _: &mut Decoder) -> ShapeResult<ResourceDescriptor> {
    let resource: ResourceDescriptor = object(value)?;
    non_blank(resource.name())?;
    Ok(resource)
}

static CURRENCY: FieldSchema<Currency> = FieldSchema {
    field: "currency",
    aliases: &["coins"],
    shapes: &[
        ShapeRule::current("coin-object", Value::is_object, coin_object),
        ShapeRule::legacy("gold-amount", Value::is_number, gold_amount),
    ],
    absent: Absent::Derive(currency_from_gold),
};

fn coin_object(value: &Value, _: &mut Decoder) -> ShapeResult<Currency> {
    object(value)
}

fn gold_amount(value: &Value, d: &mut Decoder) -> ShapeResult<Currency> {
    integer::<u32>(value, d).map(Currency::gold)
}

/// Legacy documents only tracked a single `gold` number.
fn currency_from_gold(doc: &Map<String, Value>, d: &mut Decoder) -> Result<Currency, DecodeError> {
    let Some(gold) = doc.get("gold").filter(|v| !v.is_null()) else {
        return Ok(Currency::default());
    };
    let gp = coerce::loose_integer(gold)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(DecodeError::unrecognized("currency"))?;
    d.note(DecodeIssue::LegacyShape {
        field: "currency",
        rule: "gold",
    });
    Ok(Currency::gold(gp))
}

// ============================================================================
// Attachments and metadata
// ============================================================================

static AVATAR: FieldSchema<Option<Vec<u8>>> = FieldSchema {
    field: "avatar",
    aliases: &["avatarData", "image"],
    shapes: BINARY,
    absent: Absent::Default(empty),
};

static DATE_CREATED: FieldSchema<chrono::DateTime<chrono::Utc>> = FieldSchema {
    field: "dateCreated",
    aliases: &["createdAt"],
    shapes: TIMESTAMP,
    absent: Absent::Default(now),
};

static DATE_MODIFIED: FieldSchema<Option<chrono::DateTime<chrono::Utc>>> = FieldSchema {
    field: "dateModified",
    aliases: &["updatedAt"],
    shapes: OPTIONAL_TIMESTAMP,
    absent: Absent::Default(empty),
};

// ============================================================================
// Tests
// ============================================================================

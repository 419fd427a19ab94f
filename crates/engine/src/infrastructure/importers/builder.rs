//! Importer for sheets exported by the online character builder.
//!
//! The builder layout is translated into a current-shape record document and
//! then handed to the tolerant decoder, so the decoder stays the only place
//! that knows how a record is validated and defaulted.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tavernkeep_domain::decode::coerce;
use tavernkeep_domain::{
    decode_character, flatten_rich_text, Ability, CharacterRecord, DecodeContext, DecodeError,
    Decoded,
};
use tokio::fs;

use super::builder_types::{BuilderEnvelope, BuilderSheet, BuilderWeapon};
use crate::infrastructure::ports::ClockPort;

/// `jsonType` of character sheets. Other builder exports are rejected.
pub const CHARACTER_JSON_TYPE: &str = "character";

const COIN_DENOMINATIONS: [&str; 5] = ["cp", "sp", "ep", "gp", "pp"];

/// Errors that can occur during import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported builder export: {0}")]
    UnsupportedFormat(String),
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Importer for character-builder exports.
pub struct BuilderImporter {
    clock: Arc<dyn ClockPort>,
}

impl BuilderImporter {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self { clock }
    }

    pub async fn import_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Decoded<CharacterRecord>, ImportError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        tracing::debug!(path = %path.display(), "Importing builder export");
        self.import_str(&content)
    }

    pub fn import_str(&self, raw: &str) -> Result<Decoded<CharacterRecord>, ImportError> {
        let envelope: Value = serde_json::from_str(raw)?;
        self.import_value(&envelope)
    }

    /// Import an already-parsed envelope.
    pub fn import_value(&self, envelope: &Value) -> Result<Decoded<CharacterRecord>, ImportError> {
        let envelope = BuilderEnvelope::deserialize(envelope)?;
        match envelope.json_type.as_deref() {
            None | Some(CHARACTER_JSON_TYPE) => {}
            Some(other) => return Err(ImportError::UnsupportedFormat(other.to_string())),
        }

        let sheet: BuilderSheet = match &envelope.data {
            Value::String(nested) => serde_json::from_str(nested)?,
            data @ Value::Object(_) => BuilderSheet::deserialize(data)?,
            Value::Null => {
                return Err(ImportError::UnsupportedFormat(
                    "envelope has no data".to_string(),
                ))
            }
            _ => {
                return Err(ImportError::UnsupportedFormat(
                    "data is neither an object nor a JSON string".to_string(),
                ))
            }
        };

        let document = current_document(&sheet)?;
        let decoded = decode_character(&document, &DecodeContext::at(self.clock.now()))?;

        tracing::info!(
            character = %decoded.value.name(),
            resources = decoded.value.resources().len(),
            issues = decoded.issues.len(),
            "Imported builder character"
        );
        for issue in decoded.data_loss() {
            tracing::warn!(%issue, "Builder import lost data");
        }
        Ok(decoded)
    }
}

/// Translate a builder sheet into a current-shape record document.
fn current_document(sheet: &BuilderSheet) -> Result<Value, DecodeError> {
    let name = coerce::path(&sheet.name, "value")
        .and_then(coerce::text)
        .ok_or(DecodeError::missing("name"))?;
    let stats = sheet.stats.as_ref().ok_or(DecodeError::missing("stats"))?;

    let mut doc = Map::new();
    doc.insert("name".into(), json!(name));

    // Identity
    if let Some(class) = labeled(&sheet.info, "charClass").and_then(coerce::text) {
        let level = labeled(&sheet.info, "level")
            .and_then(coerce::loose_integer)
            .unwrap_or(1)
            .max(1);
        let subclass = labeled(&sheet.info, "charSubclass")
            .and_then(coerce::text)
            .unwrap_or_default();
        doc.insert(
            "classes".into(),
            json!([{ "name": class, "subclass": subclass, "level": level }]),
        );
    }
    for (key, field) in [
        ("race", "race"),
        ("background", "background"),
        ("alignment", "alignment"),
    ] {
        if let Some(text) = labeled(&sheet.info, key).and_then(coerce::text) {
            doc.insert(field.into(), json!(text));
        }
    }
    if let Some(xp) = labeled(&sheet.info, "experience").and_then(non_negative) {
        doc.insert("experience".into(), json!(xp));
    }

    // Abilities and proficiencies
    let mut scores = Map::new();
    for ability in Ability::ALL {
        if let Some(score) = stats
            .get(ability.abbreviation())
            .and_then(|stat| coerce::path(stat, "score"))
        {
            scores.insert(ability.key().into(), score.clone());
        }
    }
    doc.insert("abilityScores".into(), Value::Object(scores));

    let saving_throws: Vec<&str> = Ability::ALL
        .into_iter()
        .filter(|ability| {
            sheet
                .saves
                .get(ability.abbreviation())
                .and_then(|save| coerce::path(save, "isProf"))
                .and_then(coerce::flag)
                == Some(true)
        })
        .map(Ability::key)
        .collect();
    doc.insert("savingThrows".into(), json!(saving_throws));

    let mut skills = Map::new();
    for (skill, entry) in &sheet.skills {
        let rank = coerce::path(entry, "isProf").and_then(|prof| {
            coerce::loose_integer(prof).or_else(|| coerce::flag(prof).map(i64::from))
        });
        if let Some(rank) = rank.filter(|rank| *rank > 0) {
            skills.insert(skill.clone(), json!(rank));
        }
    }
    doc.insert("skillProficiencies".into(), Value::Object(skills));

    // Vitality
    if let Some(max_hp) = labeled(&sheet.vitality, "hp-max").and_then(coerce::loose_integer) {
        doc.insert("maxHitPoints".into(), json!(max_hp));
    }
    if let Some(current) = labeled(&sheet.vitality, "hp-current").and_then(coerce::loose_integer) {
        doc.insert("currentHitPoints".into(), json!(current));
    }
    if let Some(temp) = labeled(&sheet.vitality, "hp-temp").and_then(coerce::loose_integer) {
        doc.insert("temporaryHitPoints".into(), json!(temp));
    }
    if let Some(ac) = labeled(&sheet.vitality, "ac").and_then(coerce::loose_integer) {
        doc.insert("armorClass".into(), json!(ac));
    }
    if let Some(speed) = labeled(&sheet.vitality, "speed").and_then(|speed| {
        non_negative(speed).or_else(|| coerce::leading_integer(speed))
    }) {
        doc.insert("speed".into(), json!(speed));
    }
    if let Some(inspiration) = coerce::flag(&sheet.inspiration) {
        doc.insert("inspiration".into(), json!(inspiration));
    }

    // Purse
    let mut currency = Map::new();
    for denomination in COIN_DENOMINATIONS {
        if let Some(amount) = labeled(&sheet.coins, denomination).and_then(non_negative) {
            currency.insert(denomination.into(), json!(amount));
        }
    }
    doc.insert("currency".into(), Value::Object(currency));

    // Rich-text sections
    for (section, field) in [
        ("personality", "personalityTraits"),
        ("ideals", "ideals"),
        ("bonds", "bonds"),
        ("flaws", "flaws"),
        ("background", "backstory"),
    ] {
        if let Some(text) = section_text(sheet, section) {
            doc.insert(field.into(), json!(text));
        }
    }
    if let Some(notes) = notes_text(sheet) {
        doc.insert("notes".into(), json!(notes));
    }

    // An unreadable row stays as null so the decoder drops and reports it
    let mut equipment: Vec<Value> = sheet
        .weapons_list
        .iter()
        .map(|row| weapon_item(row).unwrap_or(Value::Null))
        .collect();
    if let Some(text) = section_text(sheet, "equipment") {
        equipment.extend(lines(&text).map(|name| json!({ "name": name })));
    }
    doc.insert("equipment".into(), Value::Array(equipment));

    let features: Vec<Value> = ["traits", "features"]
        .into_iter()
        .filter_map(|section| section_text(sheet, section))
        .flat_map(|text| {
            lines(&text)
                .map(|name| json!({ "name": name }))
                .collect::<Vec<_>>()
        })
        .collect();
    doc.insert("features".into(), Value::Array(features));

    let resources: Vec<Value> = sheet.resources.values().map(resource_document).collect();
    doc.insert("resources".into(), Value::Array(resources));

    if let Some(avatar) = sheet.avatar.as_ref().and_then(|avatar| {
        [&avatar.webp, &avatar.jpeg]
            .into_iter()
            .flatten()
            .find(|uri| !uri.trim().is_empty())
    }) {
        doc.insert("avatar".into(), json!(avatar));
    }

    Ok(Value::Object(doc))
}

/// `section.<key>.value`
fn labeled<'a>(section: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    section.get(key).and_then(|entry| coerce::path(entry, "value"))
}

fn non_negative(value: &Value) -> Option<i64> {
    coerce::loose_integer(value).filter(|n| *n >= 0)
}

/// Flattened text of `text.<section>.value.data`, or of a plain `value`.
fn section_text(sheet: &BuilderSheet, section: &str) -> Option<String> {
    let entry = sheet.text.get(section)?;
    let body = coerce::path(entry, "value.data").or_else(|| coerce::path(entry, "value"))?;
    let text = flatten_rich_text(body);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Proficiency notes followed by the numbered note pages, in key order.
fn notes_text(sheet: &BuilderSheet) -> Option<String> {
    let mut sections: Vec<&str> = sheet
        .text
        .keys()
        .map(String::as_str)
        .filter(|key| *key == "prof" || key.starts_with("notes"))
        .collect();
    sections.sort_by_key(|key| (*key != "prof", *key));

    let pages: Vec<String> = sections
        .into_iter()
        .filter_map(|section| section_text(sheet, section))
        .collect();
    (!pages.is_empty()).then(|| pages.join("\n\n"))
}

fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// An attack row becomes a weapon item described by its bonus and damage.
fn weapon_item(row: &Value) -> Option<Value> {
    let weapon = BuilderWeapon::deserialize(row).ok()?;
    let name = coerce::path(&weapon.name, "value").and_then(coerce::text)?;
    let description: Vec<String> = [&weapon.modifier, &weapon.dmg]
        .into_iter()
        .filter_map(|part| coerce::path(part, "value").and_then(coerce::loose_text))
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect();
    Some(json!({
        "name": name,
        "type": "weapon",
        "description": description.join(", "),
    }))
}

/// Builder resource ids are not UUIDs, so the id is dropped and minted anew.
/// Counters are normalised because the builder stores them as text at times.
fn resource_document(entry: &Value) -> Value {
    let field = |key: &str| coerce::path(entry, key);
    let mut resource = Map::new();
    for key in ["name", "icon", "location"] {
        if let Some(text) = field(key).and_then(coerce::loose_text) {
            resource.insert(key.into(), json!(text));
        }
    }
    if let Some(max) = field("max").and_then(non_negative) {
        resource.insert("maxValue".into(), json!(max));
    }
    if let Some(current) = field("current").and_then(non_negative) {
        resource.insert("currentValue".into(), json!(current));
    }
    if let Some(long_rest) = field("isLongRest").and_then(coerce::flag) {
        resource.insert("longRest".into(), json!(long_rest));
    }
    if let Some(short_rest) = field("isShortRest").and_then(coerce::flag) {
        resource.insert("shortRest".into(), json!(short_rest));
    }
    Value::Object(resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use chrono::{TimeZone, Utc};
    use tavernkeep_domain::{DecodeIssue, ItemType, ProficiencyLevel, ResourceCategory, Skill};

    fn importer() -> BuilderImporter {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        BuilderImporter::new(Arc::new(FixedClock(now)))
    }

    fn rich(paragraphs: &[&str]) -> Value {
        let content: Vec<Value> = paragraphs
            .iter()
            .map(|text| json!({"type": "paragraph", "content": [{"type": "text", "text": text}]}))
            .collect();
        json!({"value": {"data": {"type": "doc", "content": content}}})
    }

    fn sheet() -> Value {
        json!({
            "name": {"value": "Бьорн"},
            "info": {
                "charClass": {"name": "charClass", "value": "Варвар"},
                "charSubclass": {"value": "Путь берсерка"},
                "level": {"value": "3"},
                "race": {"value": "Человек"},
                "background": {"value": "Чужеземец"},
                "alignment": {"value": "Хаотично-добрый"},
                "experience": {"value": 900}
            },
            "stats": {
                "str": {"score": 17}, "dex": {"score": "14"}, "con": {"score": 16},
                "int": {"score": 8}, "wis": {"score": 12}, "cha": {"score": 10}
            },
            "saves": {
                "str": {"isProf": true}, "con": {"isProf": true}, "dex": {"isProf": false}
            },
            "skills": {
                "athletics": {"baseStat": "str", "isProf": 1},
                "survival": {"baseStat": "wis", "isProf": 2},
                "history": {"baseStat": "int", "isProf": 0}
            },
            "vitality": {
                "hp-max": {"value": 35},
                "hp-current": {"value": "28"},
                "ac": {"value": 14},
                "speed": {"value": "40"},
                "isDying": false
            },
            "coins": {"gp": {"value": 15}, "sp": {"value": "4"}},
            "text": {
                "personality": rich(&["Громкий.", "Прямой."]),
                "background": rich(&["Вырос на севере."]),
                "equipment": rich(&["Рюкзак", "Спальник"]),
                "traits": rich(&["Ярость"]),
                "notes-1": rich(&["Должен гильдии."]),
                "prof": rich(&["Лёгкие доспехи"])
            },
            "resources": {
                "rage-1": {
                    "id": "rage-1", "name": "Ярость", "icon": "axe",
                    "max": "3", "current": 2, "isLongRest": true
                }
            },
            "weaponsList": [
                {"name": {"value": "Секира"}, "mod": {"value": "+5"}, "dmg": {"value": "1d12+3"}},
                "not a row"
            ],
            "inspiration": true,
            "avatar": {"webp": "data:image/webp;base64,AQID"}
        })
    }

    fn envelope(data: Value) -> Value {
        json!({"jsonType": "character", "version": "2", "data": data})
    }

    mod mapping {
        use super::*;

        #[test]
        fn maps_every_section() {
            let decoded = importer().import_value(&envelope(sheet())).unwrap();
            let record = decoded.value;

            assert_eq!(record.name().as_str(), "Бьорн");
            assert_eq!(record.primary_class(), "Варвар");
            assert_eq!(record.classes()[0].subclass, "Путь берсерка");
            assert_eq!(record.total_level(), 3);
            assert_eq!(record.race(), "Человек");
            assert_eq!(record.experience(), 900);

            assert_eq!(record.ability_scores().get(Ability::Strength), 17);
            assert_eq!(record.ability_scores().get(Ability::Dexterity), 14);
            assert_eq!(
                record.saving_throws(),
                &[Ability::Strength, Ability::Constitution]
            );
            assert_eq!(
                record.skill_proficiency(Skill::Athletics),
                ProficiencyLevel::Proficient
            );
            assert_eq!(
                record.skill_proficiency(Skill::Survival),
                ProficiencyLevel::Expertise
            );
            assert_eq!(
                record.skill_proficiency(Skill::History),
                ProficiencyLevel::None
            );

            assert_eq!(record.max_hit_points(), 35);
            assert_eq!(record.current_hit_points(), 28);
            assert_eq!(record.armor_class(), 14);
            assert_eq!(record.speed(), 40);
            assert!(record.has_inspiration());
            assert_eq!(record.currency().gp, 15);
            assert_eq!(record.currency().sp, 4);
            assert_eq!(record.avatar(), Some(&[1u8, 2, 3][..]));
        }

        #[test]
        fn flattens_rich_text_sections() {
            let record = importer().import_value(&envelope(sheet())).unwrap().value;

            assert_eq!(record.personality().traits, "Громкий.\nПрямой.");
            assert_eq!(record.personality().backstory, "Вырос на севере.");
            assert_eq!(
                record.personality().notes,
                "Лёгкие доспехи\n\nДолжен гильдии."
            );
            let features: Vec<&str> = record.features().iter().map(|f| f.name.as_str()).collect();
            assert_eq!(features, vec!["Ярость"]);
        }

        #[test]
        fn weapons_come_before_listed_gear() {
            let record = importer().import_value(&envelope(sheet())).unwrap().value;
            let equipment = record.equipment();

            assert_eq!(equipment.len(), 3);
            assert_eq!(equipment[0].name, "Секира");
            assert_eq!(equipment[0].item_type, ItemType::Weapon);
            assert_eq!(equipment[0].description, "+5, 1d12+3");
            assert_eq!(equipment[1].name, "Рюкзак");
            assert_eq!(equipment[2].name, "Спальник");
        }

        #[test]
        fn unreadable_weapon_row_is_reported() {
            let decoded = importer().import_value(&envelope(sheet())).unwrap();
            assert!(decoded.issues.contains(&DecodeIssue::MalformedElement {
                collection: "equipment",
                index: 1
            }));
        }

        #[test]
        fn resources_are_classified_with_fresh_ids() {
            let record = importer().import_value(&envelope(sheet())).unwrap().value;
            let rage = &record.resources()[0];

            assert_eq!(rage.name(), "Ярость");
            assert_eq!(rage.max_value(), 3);
            assert_eq!(rage.current_value(), 2);
            assert_eq!(rage.category(), ResourceCategory::Rage);
        }

        #[test]
        fn data_may_be_a_json_string() {
            let nested = envelope(Value::String(sheet().to_string()));
            let from_string = importer().import_value(&nested).unwrap().value;
            let from_object = importer().import_value(&envelope(sheet())).unwrap().value;

            assert_eq!(from_string.name(), from_object.name());
            assert_eq!(from_string.ability_scores(), from_object.ability_scores());
        }

        #[test]
        fn missing_envelope_type_is_accepted() {
            let raw = json!({"data": sheet()}).to_string();
            assert!(importer().import_str(&raw).is_ok());
        }
    }

    mod rejections {
        use super::*;

        #[test]
        fn missing_name_is_fatal() {
            let mut data = sheet();
            data.as_object_mut().unwrap().remove("name");
            let err = importer().import_value(&envelope(data)).unwrap_err();
            assert!(matches!(
                err,
                ImportError::Decode(DecodeError::MissingRequiredField { field: "name" })
            ));
        }

        #[test]
        fn missing_stats_is_fatal() {
            let mut data = sheet();
            data.as_object_mut().unwrap().remove("stats");
            let err = importer().import_value(&envelope(data)).unwrap_err();
            assert!(matches!(
                err,
                ImportError::Decode(DecodeError::MissingRequiredField { field: "stats" })
            ));
        }

        #[test]
        fn missing_max_hit_points_is_fatal() {
            let mut data = sheet();
            data["vitality"].as_object_mut().unwrap().remove("hp-max");
            let err = importer().import_value(&envelope(data)).unwrap_err();
            assert!(matches!(
                err,
                ImportError::Decode(DecodeError::MissingRequiredField {
                    field: "maxHitPoints"
                })
            ));
        }

        #[test]
        fn other_export_types_are_rejected() {
            let doc = json!({"jsonType": "spellbook", "data": {}});
            let err = importer().import_value(&doc).unwrap_err();
            assert!(matches!(err, ImportError::UnsupportedFormat(kind) if kind == "spellbook"));
        }

        #[test]
        fn invalid_json_is_reported() {
            let err = importer().import_str("{ nope").unwrap_err();
            assert!(matches!(err, ImportError::Json(_)));
        }
    }

    #[tokio::test]
    async fn imports_from_file() {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let path = temp_dir.path().join("bjorn.json");
        tokio::fs::write(&path, envelope(sheet()).to_string())
            .await
            .unwrap();

        let decoded = importer().import_file(&path).await.unwrap();
        assert_eq!(decoded.value.name().as_str(), "Бьорн");
    }
}

//! Reusable guards-and-transforms for building field schemas.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::coerce;
use super::schema::{CollectionPolicy, Decoder, ShapeError, ShapeResult, ShapeRule};
use crate::entities::Feature;

/// Plain text, current shape first, then a list of lines and a bare number.
pub(super) const TEXT: &[ShapeRule<String>] = &[
    ShapeRule::current("string", Value::is_string, text),
    ShapeRule::legacy("line-list", Value::is_array, joined_lines),
    ShapeRule::legacy("number", Value::is_number, number_text),
];

pub(super) const BINARY: &[ShapeRule<Option<Vec<u8>>>] = &[
    ShapeRule::current("base64", Value::is_string, base64_bytes),
    ShapeRule::legacy("byte-array", Value::is_array, raw_bytes),
    ShapeRule::legacy("buffer-object", Value::is_object, buffer_object),
];

pub(super) const TIMESTAMP: &[ShapeRule<DateTime<Utc>>] = &[
    ShapeRule::current("rfc3339", Value::is_string, timestamp),
    ShapeRule::legacy("unix-seconds", Value::is_number, unix_seconds),
];

pub(super) const OPTIONAL_TIMESTAMP: &[ShapeRule<Option<DateTime<Utc>>>] = &[
    ShapeRule::current("rfc3339", Value::is_string, some_timestamp),
    ShapeRule::legacy("unix-seconds", Value::is_number, some_unix_seconds),
];

// ----------------------------------------------------------------------------
// Absent defaults
// ----------------------------------------------------------------------------

pub(super) fn empty<T: Default>(_: &Decoder) -> T {
    T::default()
}

pub(super) fn now(decoder: &Decoder) -> DateTime<Utc> {
    decoder.now()
}

// ----------------------------------------------------------------------------
// Transforms
// ----------------------------------------------------------------------------

pub(super) fn text(value: &Value, _: &mut Decoder) -> ShapeResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or(ShapeError::Mismatch)
}

fn number_text(value: &Value, _: &mut Decoder) -> ShapeResult<String> {
    match value {
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ShapeError::Mismatch),
    }
}

fn joined_lines(value: &Value, _: &mut Decoder) -> ShapeResult<String> {
    let items = value.as_array().ok_or(ShapeError::Mismatch)?;
    let lines = items
        .iter()
        .map(Value::as_str)
        .collect::<Option<Vec<_>>>()
        .ok_or(ShapeError::Mismatch)?;
    Ok(lines.join("\n"))
}

pub(super) fn integer<T: TryFrom<i64>>(value: &Value, _: &mut Decoder) -> ShapeResult<T> {
    coerce::integer(value)
        .and_then(|n| T::try_from(n).ok())
        .ok_or(ShapeError::Mismatch)
}

pub(super) fn integer_text<T: TryFrom<i64>>(value: &Value, _: &mut Decoder) -> ShapeResult<T> {
    coerce::integer_text(value)
        .and_then(|n| T::try_from(n).ok())
        .ok_or(ShapeError::Mismatch)
}

pub(super) fn leading_integer<T: TryFrom<i64>>(value: &Value, _: &mut Decoder) -> ShapeResult<T> {
    coerce::leading_integer(value)
        .and_then(|n| T::try_from(n).ok())
        .ok_or(ShapeError::Mismatch)
}

pub(super) fn some_integer<T: TryFrom<i64>>(
    value: &Value,
    decoder: &mut Decoder,
) -> ShapeResult<Option<T>> {
    integer(value, decoder).map(Some)
}

pub(super) fn some_integer_text<T: TryFrom<i64>>(
    value: &Value,
    decoder: &mut Decoder,
) -> ShapeResult<Option<T>> {
    integer_text(value, decoder).map(Some)
}

pub(super) fn boolean(value: &Value, _: &mut Decoder) -> ShapeResult<bool> {
    value.as_bool().ok_or(ShapeError::Mismatch)
}

pub(super) fn loose_flag(value: &Value, _: &mut Decoder) -> ShapeResult<bool> {
    coerce::flag(value).ok_or(ShapeError::Mismatch)
}

fn timestamp(value: &Value, _: &mut Decoder) -> ShapeResult<DateTime<Utc>> {
    coerce::timestamp(value).ok_or(ShapeError::Mismatch)
}

fn unix_seconds(value: &Value, _: &mut Decoder) -> ShapeResult<DateTime<Utc>> {
    coerce::unix_seconds(value).ok_or(ShapeError::Mismatch)
}

fn some_timestamp(value: &Value, decoder: &mut Decoder) -> ShapeResult<Option<DateTime<Utc>>> {
    timestamp(value, decoder).map(Some)
}

fn some_unix_seconds(
    value: &Value,
    decoder: &mut Decoder,
) -> ShapeResult<Option<DateTime<Utc>>> {
    unix_seconds(value, decoder).map(Some)
}

/// Base64 text, optionally behind a `data:<mime>;base64,` header.
/// Empty text means no attachment.
fn base64_bytes(value: &Value, _: &mut Decoder) -> ShapeResult<Option<Vec<u8>>> {
    let raw = value.as_str().ok_or(ShapeError::Mismatch)?.trim();
    let payload = match raw.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, payload)| payload)
            .ok_or(ShapeError::Mismatch)?,
        None => raw,
    };
    if payload.is_empty() {
        return Ok(None);
    }
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map(Some)
        .map_err(|_| ShapeError::Mismatch)
}

fn raw_bytes(value: &Value, _: &mut Decoder) -> ShapeResult<Option<Vec<u8>>> {
    let items = value.as_array().ok_or(ShapeError::Mismatch)?;
    let bytes = items
        .iter()
        .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
        .collect::<Option<Vec<u8>>>()
        .ok_or(ShapeError::Mismatch)?;
    Ok((!bytes.is_empty()).then_some(bytes))
}

/// `{ "type": "Buffer", "data": [..] }`
fn buffer_object(value: &Value, decoder: &mut Decoder) -> ShapeResult<Option<Vec<u8>>> {
    let data = value.get("data").ok_or(ShapeError::Mismatch)?;
    raw_bytes(data, decoder)
}

// ----------------------------------------------------------------------------
// Features, shared by character features and monster traits/actions
// ----------------------------------------------------------------------------

const FEATURE_ELEMENT: &[ShapeRule<Feature>] = &[
    ShapeRule::current("object", Value::is_object, feature_object),
    ShapeRule::legacy("name", Value::is_string, feature_named),
];

/// Drop-tolerant list of features under `collection`.
pub(super) fn features(
    collection: &'static str,
    value: &Value,
    decoder: &mut Decoder,
) -> ShapeResult<Vec<Feature>> {
    let items = value.as_array().ok_or(ShapeError::Mismatch)?;
    Ok(decoder.list(
        collection,
        items,
        CollectionPolicy::DropTolerant,
        FEATURE_ELEMENT,
    )?)
}

fn feature_object(value: &Value, _: &mut Decoder) -> ShapeResult<Feature> {
    let feature: Feature = object(value)?;
    non_blank(&feature.name)?;
    Ok(feature)
}

fn feature_named(value: &Value, _: &mut Decoder) -> ShapeResult<Feature> {
    coerce::text(value)
        .map(Feature::named)
        .ok_or(ShapeError::Mismatch)
}

// ----------------------------------------------------------------------------
// Helpers for element transforms
// ----------------------------------------------------------------------------

/// Deserialize an object element through its serde impl.
pub(super) fn object<T: DeserializeOwned>(value: &Value) -> ShapeResult<T> {
    T::deserialize(value).map_err(|_| ShapeError::Mismatch)
}

/// A name must carry at least one visible character.
pub(super) fn non_blank(name: &str) -> ShapeResult<()> {
    if name.trim().is_empty() {
        Err(ShapeError::Mismatch)
    } else {
        Ok(())
    }
}

/// Non-empty trimmed lines of a free-text blob.
pub(super) fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

//! Lenient scalar readers shared by the decoder and the importers.
//!
//! Each helper returns `None` when the value cannot be read as the requested
//! scalar; none of them panic or allocate on failure.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Integer from a JSON number. Fractional numbers are rejected.
pub fn integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

/// Integer written as text, e.g. `"15"` or `" -2 "`.
pub fn integer_text(value: &Value) -> Option<i64> {
    value.as_str()?.trim().parse().ok()
}

/// Integer from either a number or numeric text.
pub fn loose_integer(value: &Value) -> Option<i64> {
    integer(value).or_else(|| integer_text(value))
}

/// Leading digits of a text value, e.g. `"30 ft."` yields 30.
pub fn leading_integer(value: &Value) -> Option<i64> {
    let text = value.as_str()?.trim();
    let end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(text.len(), |(i, _)| i);
    text[..end].parse().ok()
}

/// Boolean from `true`/`false`, a number (non-zero is true) or common words.
pub fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(_) => integer(value).map(|n| n != 0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "да" => Some(true),
            "false" | "no" | "0" | "нет" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Non-empty text, trimmed.
pub fn text(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

/// Text or a number rendered as text.
pub fn loose_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// RFC 3339 timestamp.
pub fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.as_str()?.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Unix timestamp in (possibly fractional) seconds.
pub fn unix_seconds(value: &Value) -> Option<DateTime<Utc>> {
    let secs = value.as_f64()?;
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

/// Walk a dotted path through nested objects, e.g. `"stats.str.score"`.
pub fn path<'a>(value: &'a Value, dotted: &str) -> Option<&'a Value> {
    dotted
        .split('.')
        .try_fold(value, |current, key| current.as_object()?.get(key))
        .filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers() {
        assert_eq!(integer(&json!(15)), Some(15));
        assert_eq!(integer(&json!(15.0)), Some(15));
        assert_eq!(integer(&json!(15.5)), None);
        assert_eq!(integer(&json!("15")), None);
        assert_eq!(loose_integer(&json!(" 15 ")), Some(15));
        assert_eq!(leading_integer(&json!("30 ft.")), Some(30));
        assert_eq!(leading_integer(&json!("fast")), None);
    }

    #[test]
    fn flags() {
        assert_eq!(flag(&json!(true)), Some(true));
        assert_eq!(flag(&json!(0)), Some(false));
        assert_eq!(flag(&json!(2)), Some(true));
        assert_eq!(flag(&json!("Yes")), Some(true));
        assert_eq!(flag(&json!("maybe")), None);
        assert_eq!(flag(&json!([])), None);
    }

    #[test]
    fn timestamps() {
        let rfc = timestamp(&json!("2023-05-01T12:00:00Z")).unwrap();
        let unix = unix_seconds(&json!(1_682_942_400)).unwrap();
        assert_eq!(rfc, unix);
        assert!(timestamp(&json!("yesterday")).is_none());
    }

    #[test]
    fn dotted_paths() {
        let doc = json!({"stats": {"str": {"score": 16}}, "gone": null});
        assert_eq!(path(&doc, "stats.str.score"), Some(&json!(16)));
        assert_eq!(path(&doc, "stats.dex.score"), None);
        assert_eq!(path(&doc, "gone"), None);
    }
}

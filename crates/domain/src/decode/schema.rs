//! Field schemas: the per-field fallback chain expressed as data.
//!
//! A [`FieldSchema`] lists the keys a field may live under, an ordered list of
//! [`ShapeRule`]s (guard + transform), and what to do when the field is
//! absent. [`Decoder::field`] walks that chain:
//!
//! 1. the first rule whose guard accepts the value and whose transform
//!    succeeds wins (current shapes are listed before legacy ones)
//! 2. an absent or `null` field falls to [`Absent`]
//! 3. a present value no rule accepts is [`DecodeError::UnrecognizedShape`]

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::error::{DecodeError, DecodeIssue};
use super::{DecodeContext, Decoded};

/// Why a transform rejected a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// Not this shape; try the next rule
    Mismatch,
    /// The shape matched but a nested requirement failed; stop here
    Fatal(DecodeError),
}

impl From<DecodeError> for ShapeError {
    fn from(err: DecodeError) -> Self {
        Self::Fatal(err)
    }
}

pub type ShapeResult<T> = Result<T, ShapeError>;

/// Cheap structural predicate on a raw value.
pub type Guard = fn(&Value) -> bool;

/// Converts a raw value of one shape into the current typed value.
pub type Transform<T> = fn(&Value, &mut Decoder) -> ShapeResult<T>;

/// Recovers an absent field from other keys of the same document.
pub type Derive<T> = fn(&Map<String, Value>, &mut Decoder) -> Result<T, DecodeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Current,
    Legacy,
}

/// One named entry in a field's fallback chain.
pub struct ShapeRule<T> {
    pub name: &'static str,
    pub kind: ShapeKind,
    pub guard: Guard,
    pub transform: Transform<T>,
}

impl<T> ShapeRule<T> {
    pub const fn current(name: &'static str, guard: Guard, transform: Transform<T>) -> Self {
        Self {
            name,
            kind: ShapeKind::Current,
            guard,
            transform,
        }
    }

    pub const fn legacy(name: &'static str, guard: Guard, transform: Transform<T>) -> Self {
        Self {
            name,
            kind: ShapeKind::Legacy,
            guard,
            transform,
        }
    }
}

/// Policy for a field that is missing or `null`.
pub enum Absent<T> {
    /// No safe default: decoding fails with `MissingRequiredField`
    Required,
    /// Substitute a documented default
    Default(fn(&Decoder) -> T),
    /// Recover from legacy keys elsewhere in the document
    Derive(Derive<T>),
}

/// Policy for one malformed element of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionPolicy {
    /// Skip the element, record an issue, keep going
    DropTolerant,
    /// Abort the whole decode
    FailFast,
}

/// Declarative description of one record field.
pub struct FieldSchema<T: 'static> {
    pub field: &'static str,
    pub aliases: &'static [&'static str],
    pub shapes: &'static [ShapeRule<T>],
    pub absent: Absent<T>,
}

impl<T: 'static> FieldSchema<T> {
    /// Rule names in evaluation order.
    pub fn shape_names(&self) -> Vec<&'static str> {
        self.shapes.iter().map(|rule| rule.name).collect()
    }

    pub fn is_required(&self) -> bool {
        matches!(self.absent, Absent::Required)
    }

    /// First non-null value under the field name or one of its aliases.
    fn lookup<'a>(&self, document: &'a Map<String, Value>) -> Option<&'a Value> {
        std::iter::once(self.field)
            .chain(self.aliases.iter().copied())
            .filter_map(|key| document.get(key))
            .find(|value| !value.is_null())
    }
}

/// Per-call decoding state. Holds no shared data; one per document.
#[derive(Debug)]
pub struct Decoder {
    now: DateTime<Utc>,
    issues: Vec<DecodeIssue>,
}

impl Decoder {
    pub fn new(context: &DecodeContext) -> Self {
        Self {
            now: context.now,
            issues: Vec::new(),
        }
    }

    /// The instant used for defaulted timestamps.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn issues(&self) -> &[DecodeIssue] {
        &self.issues
    }

    /// Record an absorbed problem. Duplicates are collapsed.
    pub fn note(&mut self, issue: DecodeIssue) {
        if !self.issues.contains(&issue) {
            self.issues.push(issue);
        }
    }

    pub fn finish<T>(self, value: T) -> Decoded<T> {
        Decoded {
            value,
            issues: self.issues,
        }
    }

    /// Resolve one field through its schema.
    pub fn field<T: 'static>(
        &mut self,
        document: &Map<String, Value>,
        schema: &FieldSchema<T>,
    ) -> Result<T, DecodeError> {
        let Some(value) = schema.lookup(document) else {
            return match &schema.absent {
                Absent::Required => Err(DecodeError::missing(schema.field)),
                Absent::Default(default) => Ok(default(self)),
                Absent::Derive(derive) => derive(document, self),
            };
        };
        self.apply(schema.field, schema.shapes, value)
            .map_err(|err| match err {
                ShapeError::Mismatch => DecodeError::unrecognized(schema.field),
                ShapeError::Fatal(fatal) => fatal,
            })
    }

    /// Resolve a binary attachment. Any failure resolves to `None` and is
    /// recorded as [`DecodeIssue::UnrecoverableBinary`].
    pub fn binary(
        &mut self,
        document: &Map<String, Value>,
        schema: &FieldSchema<Option<Vec<u8>>>,
    ) -> Option<Vec<u8>> {
        match self.field(document, schema) {
            Ok(bytes) => bytes,
            Err(_) => {
                self.note(DecodeIssue::UnrecoverableBinary {
                    field: schema.field,
                });
                None
            }
        }
    }

    /// Decode every element of a collection independently.
    ///
    /// An element is malformed when no rule accepts it or its transform fails
    /// fatally; the policy decides whether that drops the element or aborts.
    pub fn list<'v, T>(
        &mut self,
        collection: &'static str,
        items: impl IntoIterator<Item = &'v Value>,
        policy: CollectionPolicy,
        shapes: &[ShapeRule<T>],
    ) -> Result<Vec<T>, DecodeError> {
        let mut decoded = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            match self.apply(collection, shapes, item) {
                Ok(value) => decoded.push(value),
                Err(_) => match policy {
                    CollectionPolicy::DropTolerant => {
                        self.note(DecodeIssue::MalformedElement { collection, index });
                    }
                    CollectionPolicy::FailFast => {
                        return Err(DecodeError::malformed(collection, index));
                    }
                },
            }
        }
        Ok(decoded)
    }

    /// Run the fallback chain for one value.
    pub fn apply<T>(
        &mut self,
        field: &'static str,
        shapes: &[ShapeRule<T>],
        value: &Value,
    ) -> ShapeResult<T> {
        for rule in shapes {
            if !(rule.guard)(value) {
                continue;
            }
            match (rule.transform)(value, self) {
                Ok(decoded) => {
                    if rule.kind == ShapeKind::Legacy {
                        self.note(DecodeIssue::LegacyShape {
                            field,
                            rule: rule.name,
                        });
                    }
                    return Ok(decoded);
                }
                Err(ShapeError::Mismatch) => continue,
                Err(fatal) => return Err(fatal),
            }
        }
        Err(ShapeError::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn decoder() -> Decoder {
        Decoder::new(&DecodeContext::at(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ))
    }

    fn small(value: &Value, _: &mut Decoder) -> ShapeResult<u8> {
        value
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .ok_or(ShapeError::Mismatch)
    }

    fn from_text(value: &Value, _: &mut Decoder) -> ShapeResult<u8> {
        value
            .as_str()
            .and_then(|s| s.parse().ok())
            .ok_or(ShapeError::Mismatch)
    }

    fn seven(_: &Decoder) -> u8 {
        7
    }

    static SMALL: FieldSchema<u8> = FieldSchema {
        field: "small",
        aliases: &["tiny"],
        shapes: &[
            ShapeRule::current("number", Value::is_number, small),
            ShapeRule::legacy("text", Value::is_string, from_text),
        ],
        absent: Absent::Default(seven),
    };

    static REQUIRED: FieldSchema<u8> = FieldSchema {
        field: "required",
        aliases: &[],
        shapes: &[ShapeRule::current("number", Value::is_number, small)],
        absent: Absent::Required,
    };

    fn doc(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn current_shape_used_as_is() {
        let mut d = decoder();
        assert_eq!(d.field(&doc(json!({"small": 3})), &SMALL), Ok(3));
        assert!(d.issues().is_empty());
    }

    #[test]
    fn legacy_shape_migrated_and_noted() {
        let mut d = decoder();
        assert_eq!(d.field(&doc(json!({"small": "4"})), &SMALL), Ok(4));
        assert_eq!(
            d.issues(),
            &[DecodeIssue::LegacyShape {
                field: "small",
                rule: "text"
            }]
        );
    }

    #[test]
    fn alias_and_null() {
        let mut d = decoder();
        assert_eq!(d.field(&doc(json!({"small": null, "tiny": 2})), &SMALL), Ok(2));
        assert_eq!(d.field(&doc(json!({"small": null})), &SMALL), Ok(7));
    }

    #[test]
    fn absent_required_fails() {
        let mut d = decoder();
        assert_eq!(
            d.field(&doc(json!({})), &REQUIRED),
            Err(DecodeError::missing("required"))
        );
    }

    #[test]
    fn unknown_shape_fails() {
        let mut d = decoder();
        assert_eq!(
            d.field(&doc(json!({"small": 999})), &SMALL),
            Err(DecodeError::unrecognized("small"))
        );
        assert_eq!(
            d.field(&doc(json!({"small": [1]})), &SMALL),
            Err(DecodeError::unrecognized("small"))
        );
    }

    #[test]
    fn schema_is_inspectable() {
        assert_eq!(SMALL.shape_names(), vec!["number", "text"]);
        assert!(REQUIRED.is_required());
        assert!(!SMALL.is_required());
    }

    mod lists {
        use super::*;

        const ELEMENTS: &[ShapeRule<u8>] = &[
            ShapeRule::current("number", Value::is_number, small),
            ShapeRule::legacy("text", Value::is_string, from_text),
        ];

        #[test]
        fn drop_tolerant_skips_bad_elements() {
            let mut d = decoder();
            let items = json!([1, "x", 3, true]);
            let out = d
                .list(
                    "things",
                    items.as_array().unwrap(),
                    CollectionPolicy::DropTolerant,
                    ELEMENTS,
                )
                .unwrap();
            assert_eq!(out, vec![1, 3]);
            assert!(d.issues().contains(&DecodeIssue::MalformedElement {
                collection: "things",
                index: 1
            }));
            assert!(d.issues().contains(&DecodeIssue::MalformedElement {
                collection: "things",
                index: 3
            }));
        }

        #[test]
        fn fail_fast_aborts_on_first_bad_element() {
            let mut d = decoder();
            let items = json!([1, "2", 300]);
            let err = d
                .list(
                    "things",
                    items.as_array().unwrap(),
                    CollectionPolicy::FailFast,
                    ELEMENTS,
                )
                .unwrap_err();
            assert_eq!(err, DecodeError::malformed("things", 2));
        }
    }
}

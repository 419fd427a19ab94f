//! Tolerant decoding of untyped record documents.
//!
//! Documents written by older versions of the app (or by other tools) drift:
//! fields get renamed, scalars become lists, numbers become strings. Each
//! record field is described by a [`FieldSchema`] that lists the shapes it has
//! had over time, newest first, plus what to do when it is missing.
//!
//! Decoding never panics and never yields a half-built record: the result is
//! either a complete record plus the [`DecodeIssue`]s that were absorbed on the
//! way, or the first fatal [`DecodeError`].
//!
//! ```
//! use chrono::Utc;
//! use serde_json::json;
//! use tavernkeep_domain::decode::{decode_character, DecodeContext};
//!
//! let doc = json!({
//!     "name": "Мира",
//!     "abilityScores": [10, 16, 12, 14, 13, 8],
//!     "maxHitPoints": 9,
//!     "equipment": ["Dagger"]
//! });
//! let decoded = decode_character(&doc, &DecodeContext::at(Utc::now())).unwrap();
//!
//! assert_eq!(decoded.value.ability_scores().dexterity, 16);
//! assert_eq!(decoded.value.equipment()[0].name, "Dagger");
//! assert!(decoded.issues.iter().all(|issue| !issue.is_data_loss()));
//! ```

mod abilities;
mod character;
pub mod coerce;
mod error;
mod monster;
mod schema;
mod shapes;

use chrono::{DateTime, Utc};

pub use character::decode_character;
pub use error::{DecodeError, DecodeIssue};
pub use monster::decode_monster;
pub use schema::{
    Absent, CollectionPolicy, Decoder, FieldSchema, ShapeError, ShapeKind, ShapeResult, ShapeRule,
};

/// Inputs the decoder needs from outside. The decoder reads no clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeContext {
    /// Substituted for absent creation timestamps
    pub now: DateTime<Utc>,
}

impl DecodeContext {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

/// A decoded value and everything that was absorbed to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub issues: Vec<DecodeIssue>,
}

impl<T> Decoded<T> {
    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            issues: self.issues,
        }
    }

    /// Issues that lost data, as opposed to plain shape migrations.
    pub fn data_loss(&self) -> impl Iterator<Item = &DecodeIssue> {
        self.issues.iter().filter(|issue| issue.is_data_loss())
    }
}

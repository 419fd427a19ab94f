//! Decode error taxonomy.
//!
//! `DecodeError` is fatal for the enclosing record. `DecodeIssue` describes
//! something the decoder absorbed; issues never abort a decode.

use std::fmt;

use thiserror::Error;

/// Fatal decode failure. No partial record is produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The document root is not a JSON object
    #[error("Document is not a JSON object")]
    NotAnObject,

    /// A field with no safe default is absent
    #[error("Missing required field: {field}")]
    MissingRequiredField { field: &'static str },

    /// A field is present but in no shape any migration rule recognises
    #[error("Unrecognized shape for field: {field}")]
    UnrecognizedShape { field: &'static str },

    /// An element of a fail-fast collection could not be decoded
    #[error("Malformed element {index} in {collection}")]
    MalformedElement {
        collection: &'static str,
        index: usize,
    },
}

impl DecodeError {
    pub fn missing(field: &'static str) -> Self {
        Self::MissingRequiredField { field }
    }

    pub fn unrecognized(field: &'static str) -> Self {
        Self::UnrecognizedShape { field }
    }

    pub fn malformed(collection: &'static str, index: usize) -> Self {
        Self::MalformedElement { collection, index }
    }

    /// The field or collection this error names, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::NotAnObject => None,
            Self::MissingRequiredField { field } | Self::UnrecognizedShape { field } => Some(field),
            Self::MalformedElement { collection, .. } => Some(collection),
        }
    }
}

/// Something recoverable the decoder absorbed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeIssue {
    /// An element of a drop-tolerant collection was skipped
    MalformedElement {
        collection: &'static str,
        index: usize,
    },
    /// A binary field could not be decoded and resolved to absent
    UnrecoverableBinary { field: &'static str },
    /// A legacy shape was migrated to the current one
    LegacyShape {
        field: &'static str,
        rule: &'static str,
    },
}

impl DecodeIssue {
    /// True for issues that lost data (as opposed to plain migrations).
    pub fn is_data_loss(&self) -> bool {
        !matches!(self, Self::LegacyShape { .. })
    }
}

impl fmt::Display for DecodeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedElement { collection, index } => {
                write!(f, "dropped malformed element {} of {}", index, collection)
            }
            Self::UnrecoverableBinary { field } => {
                write!(f, "discarded undecodable binary field {}", field)
            }
            Self::LegacyShape { field, rule } => {
                write!(f, "migrated {} from legacy shape '{}'", field, rule)
            }
        }
    }
}

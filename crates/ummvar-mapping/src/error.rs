//! Error types for the mapping engine.

use serde::Serialize;
use thiserror::Error;

pub type MappingResult<T> = Result<T, MappingError>;

/// Errors surfaced by the mapping engine's public API.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error(transparent)]
    Traversal(#[from] TraversalError),

    /// The alias table file could not be read or is invalid.
    #[error("alias table error: {0}")]
    AliasTable(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MappingError {
    pub fn alias_table(msg: impl Into<String>) -> Self {
        Self::AliasTable(msg.into())
    }
}

/// Fatal failure to walk a granule. Nothing is emitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraversalError {
    /// The granule could not be read.
    #[error("granule {source_name} could not be read: {reason}")]
    Unreadable { source_name: String, reason: String },

    /// Two variables resolve to the same path or record name.
    #[error("duplicate variable path: {0}")]
    DuplicatePath(String),
}

impl TraversalError {
    pub fn unreadable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Unreadable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

/// An attribute value that cannot be represented in the target type.
///
/// Recoverable: the field is left out of the record and the raw attribute is
/// kept verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeCoercionError {
    #[error("{attribute}: non-finite value {value}")]
    NonFinite { attribute: String, value: String },

    #[error("{attribute}: value {value} is out of range for {dtype}")]
    OutOfRange {
        attribute: String,
        value: String,
        dtype: String,
    },

    #[error("{attribute}: fractional value {value} for integer type {dtype}")]
    Fractional {
        attribute: String,
        value: String,
        dtype: String,
    },

    #[error("{attribute}: text value '{value}' for numeric type {dtype}")]
    TextForNumeric {
        attribute: String,
        value: String,
        dtype: String,
    },

    #[error("{attribute}: numeric value {value} for text type")]
    NumericForText { attribute: String, value: String },

    #[error("{attribute}: no typed representation for {dtype}")]
    UnsupportedType { attribute: String, dtype: String },

    #[error("{attribute}: expected {expected} value(s), found {found}")]
    WrongLength {
        attribute: String,
        expected: usize,
        found: usize,
    },
}

impl TypeCoercionError {
    /// Name of the attribute that failed to coerce.
    pub fn attribute(&self) -> &str {
        match self {
            Self::NonFinite { attribute, .. }
            | Self::OutOfRange { attribute, .. }
            | Self::Fractional { attribute, .. }
            | Self::TextForNumeric { attribute, .. }
            | Self::NumericForText { attribute, .. }
            | Self::UnsupportedType { attribute, .. }
            | Self::WrongLength { attribute, .. } => attribute,
        }
    }
}

/// A recoverable problem found while building one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Full variable path, e.g. `/geophysical_data/sst`.
    pub path: String,
    /// Record name the diagnostic belongs to.
    pub name: String,
    pub attribute: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        attribute: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    pub fn from_coercion(path: &str, name: &str, error: &TypeCoercionError) -> Self {
        Self::new(path, name, error.attribute(), error.to_string())
    }
}

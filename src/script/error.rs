//! Script serialization errors.

use std::fmt;

/// Errors from reading a document out of a script table.
///
/// Loading is atomic: on any error the partially built document is
/// discarded and the reader may be left mid-descent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// A required field is absent or has the wrong type.
    MissingField { table: String, field: String },
    /// A `type` field holds a tag this version does not know.
    UnknownTypeTag { table: String, tag: String },
    /// A field value is outside its legal range.
    InvalidValue { field: String, value: String },
    /// Descending into a named or indexed subtable failed.
    MissingTable { table: String },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { table, field } => {
                write!(f, "missing field '{field}' in table '{table}'")
            }
            Self::UnknownTypeTag { table, tag } => {
                write!(f, "unknown type tag '{tag}' in table '{table}'")
            }
            Self::InvalidValue { field, value } => {
                write!(f, "invalid value '{value}' for field '{field}'")
            }
            Self::MissingTable { table } => write!(f, "missing table '{table}'"),
        }
    }
}

impl std::error::Error for ScriptError {}

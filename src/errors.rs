//! Error types for schema validation
//!
//! Two distinct failure families:
//! - validation errors: data problems, collected as [`Violation`] entries
//!   and aggregated into one [`AggregateError`] per validation
//! - developer errors: programming mistakes in the schema itself
//!   (unsupported type tag, malformed description, bad regex), surfaced
//!   through [`SchemaError`] and never recorded as validation errors

use serde::Serialize;
use thiserror::Error;

use crate::path::PathSeg;
use crate::value::Value;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// One recorded validation failure: a message plus the path of the value
/// that failed, for structured consumption alongside the human-readable
/// aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub message: String,
    pub path: Vec<PathSeg>,
}

/// Every violation of one validation joined into a single error, followed
/// by a cycle-safe rendering of the root value.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AggregateError {
    pub message: String,
}

impl AggregateError {
    pub(crate) fn from_violations(root: Option<&Value>, violations: &[Violation]) -> Self {
        let mut message = String::from("Validation Error");
        for violation in violations {
            message.push_str("\n\t");
            message.push_str(&violation.message);
        }
        message.push_str("\n\tin ");
        match root {
            Some(value) => message.push_str(&value.inspect()),
            None => message.push_str("undefined"),
        }
        AggregateError { message }
    }
}

/// Errors that make `validate` return `Err` instead of a report.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A schema description names a type tag outside the supported set.
    /// A developer error: raised unconditionally, never aggregated.
    #[error("Field{path}should be type '{tag}' but that type isn't supported by shapecheck.")]
    UnsupportedType { path: String, tag: String },

    /// A schema description that cannot be interpreted at all.
    #[error("Malformed schema{path}: {reason}.")]
    Malformed { path: String, reason: String },

    /// A string constraint carries a pattern the regex engine rejects.
    #[error("Field '{name}' has an invalid regex '{pattern}'.")]
    InvalidRegex {
        name: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Raised when `throw_on_invalid` is set and the node's subtree failed;
    /// carries the aggregated error for just that subtree.
    #[error(transparent)]
    Invalid(#[from] AggregateError),
}

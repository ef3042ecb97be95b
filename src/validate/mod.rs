//! Public validation entry point
//!
//! `validate` normalizes the schema, runs the recursive engine over the
//! value, and shapes the outcome into a [`Report`]. The input value is
//! mutated in place: defaults are written into it, extra or invalid fields
//! may be deleted from it. Fields that errored without a delete or default
//! policy keep their original offending value.

mod default;
mod engine;

use tracing::debug;

use crate::errors::{AggregateError, SchemaResult, Violation};
use crate::schema::{normalize, Definition};
use crate::value::Value;

/// Outcome of one validation.
#[derive(Debug)]
pub struct Report {
    /// The validated value, with defaults applied and deletions performed;
    /// `None` when the root was absent and stayed absent
    pub data: Option<Value>,
    /// Every recorded failure, in traversal order
    pub errors: Vec<Violation>,
    /// The failures joined into one error; present iff `errors` is non-empty
    pub err: Option<AggregateError>,
    /// `errors.is_empty()`
    pub success: bool,
}

/// Validates `value` against `def`.
///
/// Accepts a `Value` or `None` for an absent root:
///
/// ```
/// use shapecheck::{validate, Definition, Value};
///
/// let def = Definition::object(vec![
///     Definition::string().named("name").required(true),
/// ]);
/// let value = Value::from_json(&serde_json::json!({ "name": "Alice" }));
/// let report = validate(value, &def).unwrap();
/// assert!(report.success);
/// ```
///
/// Returns `Err` only for developer errors in the schema itself and for
/// subtrees that fail under `throw_on_invalid`; every data problem comes
/// back as a `Report` with `success == false`.
pub fn validate(value: impl Into<Option<Value>>, def: &Definition) -> SchemaResult<Report> {
    let value = value.into();
    let node = normalize(def)?;

    let mut ctx = engine::Ctx::new(value.clone());
    let data = engine::check_field(&mut ctx, value, &node, None)?;

    let engine::Ctx { errors, root, .. } = ctx;
    let err = if errors.is_empty() {
        None
    } else {
        Some(AggregateError::from_violations(root.as_ref(), &errors))
    };

    let report = Report {
        data,
        success: errors.is_empty(),
        errors,
        err,
    };
    debug!(
        success = report.success,
        errors = report.errors.len(),
        "validation finished"
    );
    Ok(report)
}

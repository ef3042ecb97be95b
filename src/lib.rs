//! shapecheck - a strict, schema-driven structural validator
//!
//! Validates a dynamic [`Value`] against a declarative [`Definition`]:
//! checks types and constraints recursively, fills defaults (literal or
//! computed) into the value in place, optionally deletes invalid or
//! undeclared fields, and aggregates every failure into one report.

pub mod errors;
pub mod path;
pub mod schema;
pub mod validate;
pub mod value;

pub use errors::{AggregateError, SchemaError, SchemaResult, Violation};
pub use path::PathSeg;
pub use schema::{ChildSchema, CustomArgs, CustomCheck, DefaultArgs, DefaultSpec, Definition, Kind};
pub use validate::{validate, Report};
pub use value::{Instance, Map, NativeFn, Value};

//! Default resolution
//!
//! Literal defaults are returned verbatim; computed defaults receive the
//! in-progress traversal context so they can read siblings, ancestors, and
//! their position in an enclosing array.

use super::engine::Ctx;
use crate::path::PathSeg;
use crate::schema::{DefaultArgs, DefaultSpec, Definition};
use crate::value::Value;

pub(crate) fn resolve_default(
    spec: &DefaultSpec,
    def: &Definition,
    ctx: &Ctx,
    value: Option<&Value>,
    current: Option<&Value>,
) -> Value {
    match spec {
        DefaultSpec::Literal(default) => default.clone(),
        DefaultSpec::Computed(f) => {
            let args = DefaultArgs {
                root: ctx.root.as_ref(),
                value,
                def,
                path: &ctx.path,
                current,
                index: enclosing_index(ctx),
            };
            f(&args)
        }
    }
}

/// When the field being defaulted lives in an object that is itself an
/// array element, yields that element's index.
fn enclosing_index(ctx: &Ctx) -> Option<usize> {
    let grandparent_at = ctx.parents.len().checked_sub(2)?;
    match (ctx.parents.get(grandparent_at), ctx.path.get(grandparent_at)) {
        (Some(Value::Array(_)), Some(PathSeg::Index(index))) => Some(*index),
        _ => None,
    }
}

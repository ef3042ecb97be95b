//! Cycle-safe value rendering for error messages
//!
//! Produces a compact, single-line representation of a value. Containers
//! already on the current rendering branch print as `[Circular]`, so a
//! self-referential value terminates instead of recursing forever. Shared
//! but acyclic containers render normally at every occurrence.

use std::rc::Rc;

use super::Value;

pub(crate) fn render(value: &Value) -> String {
    let mut out = String::new();
    let mut branch = Vec::new();
    write_value(&mut out, value, &mut branch);
    out
}

fn write_value(out: &mut String, value: &Value, branch: &mut Vec<usize>) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(*n)),
        Value::String(s) => out.push_str(&format!("{:?}", s)),
        Value::Date(dt) => out.push_str(&dt.to_rfc3339()),
        Value::Function(_) => out.push_str("[function]"),
        Value::Instance(instance) => {
            out.push_str("[instance ");
            out.push_str(instance.class());
            out.push(']');
        }
        Value::Array(items) => {
            let id = Rc::as_ptr(items) as usize;
            if branch.contains(&id) {
                out.push_str("[Circular]");
                return;
            }
            branch.push(id);
            let items = items.borrow();
            if items.is_empty() {
                out.push_str("[]");
            } else {
                out.push_str("[ ");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_value(out, item, branch);
                }
                out.push_str(" ]");
            }
            branch.pop();
        }
        Value::Object(map) => {
            let id = Rc::as_ptr(map) as usize;
            if branch.contains(&id) {
                out.push_str("[Circular]");
                return;
            }
            branch.push(id);
            let map = map.borrow();
            if map.is_empty() {
                out.push_str("{}");
            } else {
                out.push_str("{ ");
                for (i, (key, entry)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(key);
                    out.push_str(": ");
                    write_value(out, entry, branch);
                }
                out.push_str(" }");
            }
            branch.pop();
        }
    }
}

/// Integral numbers print without a trailing `.0` so messages read like the
/// values users wrote.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

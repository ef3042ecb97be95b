//! The recursive validation engine
//!
//! One traversal context is created per top-level validation and threaded
//! through every recursive call; there is no process-wide state, so nested
//! and concurrent validations cannot interfere.
//!
//! Composite checkers never hold a container borrow across recursion: they
//! snapshot keys or elements first, recurse, then re-borrow to write back
//! or delete. Deletions in arrays are deferred to the end of the pass so
//! the index walk neither skips nor revisits elements.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use super::default::resolve_default;
use crate::errors::{AggregateError, SchemaError, SchemaResult, Violation};
use crate::path::{self, PathSeg};
use crate::schema::{Children, CustomArgs, Kind, Node};
use crate::value::{Map, Value};

/// Per-validation traversal state.
pub(crate) struct Ctx {
    /// Path of the value currently being checked
    pub(crate) path: Vec<PathSeg>,
    /// Enclosing containers, parallel to `path`
    pub(crate) parents: Vec<Value>,
    pub(crate) errors: Vec<Violation>,
    pub(crate) root: Option<Value>,
}

impl Ctx {
    pub(crate) fn new(root: Option<Value>) -> Self {
        Ctx {
            path: Vec::new(),
            parents: Vec::new(),
            errors: Vec::new(),
            root,
        }
    }

    fn fail(&mut self, message: String) {
        self.errors.push(Violation {
            message,
            path: self.path.clone(),
        });
    }

    fn phrase(&self) -> String {
        path::phrase(&self.path)
    }
}

/// Validates one (value, node) pair, returning the possibly replaced value.
///
/// `None` in means the value is absent; `None` out means it still is.
pub(crate) fn check_field(
    ctx: &mut Ctx,
    value: Option<Value>,
    node: &Node,
    current: Option<&Value>,
) -> SchemaResult<Option<Value>> {
    trace!(path = %path::join(&ctx.path), kind = node.kind.as_str(), "checking field");

    let value = match value {
        Some(value) => value,
        None if node.required => {
            let message = format!("Required field{}does not exist.", ctx.phrase());
            let violation = Violation {
                message,
                path: ctx.path.clone(),
            };
            if node.throw_on_invalid {
                return Err(SchemaError::Invalid(AggregateError::from_violations(
                    ctx.root.as_ref(),
                    &[violation],
                )));
            }
            ctx.errors.push(violation);
            return Ok(None);
        }
        None => match &node.default {
            None => return Ok(None),
            Some(spec) => {
                let resolved = resolve_default(spec, &node.def, ctx, None, current);
                if !matches!(node.kind, Kind::Object | Kind::Array) {
                    return Ok(Some(resolved));
                }
                // defaulted objects and arrays still run their children, so
                // nested requireds and defaults apply to the default too
                resolved
            }
        },
    };

    let mark = ctx.errors.len();
    let mut type_ok = true;

    match node.kind {
        Kind::Any => {}
        Kind::String => match &value {
            Value::String(s) => check_string(ctx, s, node),
            _ => type_ok = false,
        },
        Kind::Number => type_ok = matches!(value, Value::Number(_)),
        Kind::Boolean => type_ok = matches!(value, Value::Bool(_)),
        Kind::Function => type_ok = matches!(value, Value::Function(_)),
        Kind::Date => type_ok = matches!(value, Value::Date(_)),
        Kind::Class => match &value {
            Value::Instance(instance) => {
                // a class node without a declared name accepts any instance
                type_ok = node
                    .class
                    .as_deref()
                    .map_or(true, |class| class == instance.class());
            }
            _ => type_ok = false,
        },
        Kind::Object => match &value {
            Value::Object(map) => check_object(ctx, &value, map, node)?,
            _ => type_ok = false,
        },
        Kind::IndexObject | Kind::SimpleObject => match &value {
            Value::Object(map) => check_keyed(ctx, &value, map, node)?,
            _ => type_ok = false,
        },
        Kind::Array => match &value {
            Value::Array(items) => check_array(ctx, &value, items, node)?,
            _ => type_ok = false,
        },
    }

    if !type_ok {
        ctx.fail(format!(
            "Field{}should be type '{}' but is type '{}'. Value is {}.",
            ctx.phrase(),
            node.kind.as_str(),
            value.type_name(),
            value.inspect(),
        ));
    } else if !node.custom.is_empty() {
        let args = CustomArgs {
            value: &value,
            current,
        };
        for check in &node.custom {
            if !check.run(&args) {
                ctx.fail(format!(
                    "Field{}failed custom validation '{}'.",
                    ctx.phrase(),
                    check.label,
                ));
            }
        }
    }

    if ctx.errors.len() > mark {
        if node.default_on_invalid {
            if let Some(spec) = &node.default {
                ctx.errors.truncate(mark);
                let resolved = resolve_default(spec, &node.def, ctx, Some(&value), current);
                return Ok(Some(resolved));
            }
        }
        if node.throw_on_invalid {
            return Err(SchemaError::Invalid(AggregateError::from_violations(
                ctx.root.as_ref(),
                &ctx.errors[mark..],
            )));
        }
    }

    Ok(Some(value))
}

/// String constraints: enum, min/max length, regex. Each failing check
/// records its own error regardless of the others.
fn check_string(ctx: &mut Ctx, value: &str, node: &Node) {
    if let Some(allowed) = &node.enum_values {
        if !allowed.iter().any(|candidate| candidate == value) {
            ctx.fail(format!(
                "Field{}must be a value in '{}'.",
                ctx.phrase(),
                allowed.join(","),
            ));
        }
    }
    if let Some(min) = node.min {
        if value.chars().count() < min {
            ctx.fail(format!(
                "Field{}has a minimum length of '{}'.",
                ctx.phrase(),
                min,
            ));
        }
    }
    if let Some(max) = node.max {
        if value.chars().count() > max {
            ctx.fail(format!(
                "Field{}has a maximum length of '{}'.",
                ctx.phrase(),
                max,
            ));
        }
    }
    if let Some(regex) = &node.regex {
        if !regex.is_match(value) {
            ctx.fail(format!(
                "Field{}does not match a regex of '{}'.",
                ctx.phrase(),
                regex.as_str(),
            ));
        }
    }
}

fn check_object(
    ctx: &mut Ctx,
    value: &Value,
    map: &Rc<RefCell<Map>>,
    node: &Node,
) -> SchemaResult<()> {
    let fields = match &node.children {
        Children::Fields(fields) => fields,
        _ => return Ok(()),
    };

    let mut declared: Vec<&str> = Vec::with_capacity(fields.len());
    for field in fields {
        let name = field.name.as_deref().unwrap_or_default();
        declared.push(name);

        let child_value = map.borrow().get(name).cloned();

        ctx.path.push(PathSeg::Key(name.to_string()));
        ctx.parents.push(value.clone());
        let mark = ctx.errors.len();
        let result = check_field(ctx, child_value, field, Some(value));
        ctx.path.pop();
        ctx.parents.pop();
        let returned = result?;

        if field.delete_on_invalid && ctx.errors.len() > mark {
            ctx.errors.truncate(mark);
            map.borrow_mut().shift_remove(name);
        } else if let Some(data) = returned {
            map.borrow_mut().insert(name.to_string(), data);
        }
    }

    if !node.allow_extra_keys || node.delete_extra_keys {
        let extra: Vec<String> = map
            .borrow()
            .keys()
            .filter(|key| !declared.contains(&key.as_str()))
            .cloned()
            .collect();
        for key in extra {
            if node.delete_extra_keys {
                map.borrow_mut().shift_remove(&key);
            } else {
                ctx.fail(format!(
                    "Object{}contains extra key '{}' not declared in schema.",
                    ctx.phrase(),
                    key,
                ));
            }
        }
    }

    Ok(())
}

/// indexObject and simpleObject: every present key validated against the
/// uniform child schema, with replacement values written back into the
/// entry. The node's own `delete_on_invalid` removes failing entries
/// instead of recording their errors.
fn check_keyed(
    ctx: &mut Ctx,
    value: &Value,
    map: &Rc<RefCell<Map>>,
    node: &Node,
) -> SchemaResult<()> {
    let child = match &node.children {
        Children::Uniform(child) => child,
        _ => return Ok(()),
    };

    let keys: Vec<String> = map.borrow().keys().cloned().collect();
    for key in keys {
        let entry = match map.borrow().get(&key).cloned() {
            Some(entry) => entry,
            None => continue,
        };

        ctx.path.push(PathSeg::Key(key.clone()));
        ctx.parents.push(value.clone());
        let mark = ctx.errors.len();
        let result = check_field(ctx, Some(entry), child, Some(value));
        ctx.path.pop();
        ctx.parents.pop();
        let returned = result?;

        if node.delete_on_invalid && ctx.errors.len() > mark {
            ctx.errors.truncate(mark);
            map.borrow_mut().shift_remove(&key);
        } else if let Some(data) = returned {
            map.borrow_mut().insert(key.clone(), data);
        }
    }

    Ok(())
}

fn check_array(
    ctx: &mut Ctx,
    value: &Value,
    items: &Rc<RefCell<Vec<Value>>>,
    node: &Node,
) -> SchemaResult<()> {
    let child = match &node.children {
        Children::Uniform(child) => child,
        _ => return Ok(()),
    };

    let len = items.borrow().len();
    let mut removals: Vec<usize> = Vec::new();
    for index in 0..len {
        let element = match items.borrow().get(index).cloned() {
            Some(element) => element,
            None => break,
        };

        ctx.path.push(PathSeg::Index(index));
        ctx.parents.push(value.clone());
        let mark = ctx.errors.len();
        let result = check_field(ctx, Some(element), child, Some(value));
        ctx.path.pop();
        ctx.parents.pop();
        let returned = result?;

        if child.delete_on_invalid && ctx.errors.len() > mark {
            ctx.errors.truncate(mark);
            removals.push(index);
        } else if let Some(data) = returned {
            items.borrow_mut()[index] = data;
        }
    }

    // removing back-to-front keeps the remaining indices valid
    for &index in removals.iter().rev() {
        items.borrow_mut().remove(index);
    }

    Ok(())
}

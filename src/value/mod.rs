//! Dynamic value model for validation
//!
//! Values are owned, dynamically typed, and cheap to clone: arrays and
//! objects are shared `Rc<RefCell<..>>` containers, so a clone of a
//! composite value aliases the same storage. This is what lets the
//! validator mutate the caller's value in place (writing defaults, deleting
//! keys) and what makes self-referential values representable at all.
//!
//! Absence is not a variant. A missing object key or a missing root is an
//! `Option<Value>::None` at the engine boundary; `Value::Null` is a present
//! value that fails every type check except `any`.

mod json;
mod render;

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Insertion-ordered map used for object values.
///
/// Key order is preserved so traversal and error ordering are deterministic.
pub type Map = IndexMap<String, Value>;

/// A dynamically typed runtime value.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// A point in time; matched by the `date` type tag
    Date(DateTime<Utc>),
    /// An opaque callable; matched by the `function` type tag, never invoked
    Function(NativeFn),
    /// A nominally typed opaque payload; matched by the `class` type tag
    Instance(Instance),
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<Map>>),
}

impl Value {
    /// Builds an array value from owned elements.
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    /// Builds an object value from key/value pairs, preserving order.
    pub fn object<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        Value::Object(Rc::new(RefCell::new(entries.into_iter().collect())))
    }

    /// An empty object.
    pub fn empty_object() -> Self {
        Value::object(Vec::new())
    }

    /// Wraps a Rust closure as a function value.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        Value::Function(NativeFn::new(f))
    }

    /// Wraps an arbitrary Rust payload as a named class instance.
    pub fn instance(class: &str, payload: impl Any) -> Self {
        Value::Instance(Instance::new(class, payload))
    }

    /// The type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Function(_) => "function",
            Value::Instance(_) => "instance",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Looks up an object key, returning a shared handle to the entry.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(map) => map.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Looks up an array element by index.
    pub fn get_index(&self, index: usize) -> Option<Value> {
        match self {
            Value::Array(items) => items.borrow().get(index).cloned(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Cycle-safe human-readable rendering, used when formatting the
    /// aggregated error. Shared containers that recur on the same branch
    /// print as `[Circular]`.
    pub fn inspect(&self) -> String {
        render::render(self)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::Date(dt)
    }
}

/// Deep structural equality for scalars and containers; identity equality
/// for functions and instance payloads. Comparing cyclic values recurses
/// until a shared-container identity match short-circuits, so only compare
/// values known to be acyclic or sharing structure.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Instance(a), Value::Instance(b)) => a.ptr_eq(b),
            (Value::Array(a), Value::Array(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Value::Object(a), Value::Object(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            _ => false,
        }
    }
}

/// An opaque callable value.
///
/// The validator only recognizes the `function` type tag; it never calls
/// the closure. Callers that stash behavior in validated data can invoke it
/// through [`NativeFn::call`].
#[derive(Clone)]
pub struct NativeFn(Rc<dyn Fn(&[Value]) -> Value>);

impl NativeFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        NativeFn(Rc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[function]")
    }
}

/// A nominally typed value: a class name plus an opaque shared payload.
///
/// The `class` type tag matches on the name alone; the payload is for the
/// caller's benefit and can be recovered with [`Instance::downcast_ref`].
#[derive(Clone)]
pub struct Instance {
    class: Rc<str>,
    payload: Rc<dyn Any>,
}

impl Instance {
    pub fn new(class: &str, payload: impl Any) -> Self {
        Instance {
            class: Rc::from(class),
            payload: Rc::new(payload),
        }
    }

    /// The declared class name.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Recovers the payload if it has the requested concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref()
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.payload, &other.payload)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[instance {}]", self.class)
    }
}

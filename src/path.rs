//! Path context for validation traversal
//!
//! A path is the ordered sequence of object keys and array indices locating
//! the value currently being checked, relative to the root of the
//! validation. Paths appear in every error entry and are handed to computed
//! defaults; they are never persisted anywhere else.

use std::fmt;

use serde::{Serialize, Serializer};

/// One step of a path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSeg {
    /// Object field name or keyed-map entry key
    Key(String),
    /// Array element index
    Index(usize),
}

impl fmt::Display for PathSeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSeg::Key(key) => write!(f, "{}", key),
            PathSeg::Index(index) => write!(f, "{}", index),
        }
    }
}

impl Serialize for PathSeg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PathSeg::Key(key) => serializer.serialize_str(key),
            PathSeg::Index(index) => serializer.serialize_u64(*index as u64),
        }
    }
}

impl From<&str> for PathSeg {
    fn from(key: &str) -> Self {
        PathSeg::Key(key.to_string())
    }
}

impl From<usize> for PathSeg {
    fn from(index: usize) -> Self {
        PathSeg::Index(index)
    }
}

/// Joins path segments with dots: `foo.2.bar`.
pub fn join(path: &[PathSeg]) -> String {
    let parts: Vec<String> = path.iter().map(ToString::to_string).collect();
    parts.join(".")
}

/// Renders a path for insertion into an error message.
///
/// The root path renders as a single space so messages read naturally both
/// with and without a path: `Field 'foo.bar' is ...` vs `Field is ...`.
pub(crate) fn phrase(path: &[PathSeg]) -> String {
    if path.is_empty() {
        " ".to_string()
    } else {
        format!(" '{}' ", join(path))
    }
}

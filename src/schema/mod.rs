//! Schema description and normalization
//!
//! [`Definition`] is the raw, author-facing schema node; `normalize`
//! produces the canonical tree the validation engine traverses. Schemas can
//! be built programmatically or parsed from a JSON description.

mod normalize;
mod parse;
mod types;

pub use types::{
    ChildSchema, CustomArgs, CustomCheck, DefaultArgs, DefaultSpec, Definition, Kind,
};

pub(crate) use normalize::{normalize, Children, Node};

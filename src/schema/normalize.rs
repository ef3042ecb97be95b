//! Schema normalization
//!
//! Turns a raw [`Definition`] into the canonical [`Node`] tree the engine
//! traverses: every option filled with its documented default, the regex
//! compiled, and the `schema` attribute unified into [`Children`].
//!
//! Normalization is pure and runs once per top-level validation. It never
//! mutates or aliases the caller's `Definition`, so one definition (even a
//! frozen/shared one) can back any number of concurrent validations.

use regex::Regex;

use super::types::{ChildSchema, CustomCheck, DefaultSpec, Definition, Kind};
use crate::errors::{SchemaError, SchemaResult};

/// Canonical child shape after normalization.
#[derive(Debug)]
pub(crate) enum Children {
    None,
    /// One schema applied to every element/entry
    Uniform(Box<Node>),
    /// Named field list (object form)
    Fields(Vec<Node>),
}

/// A canonical schema node. Options are no longer optional.
#[derive(Debug)]
pub(crate) struct Node {
    pub kind: Kind,
    pub name: Option<String>,
    pub required: bool,
    pub default: Option<DefaultSpec>,
    pub enum_values: Option<Vec<String>>,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub regex: Option<Regex>,
    pub class: Option<String>,
    pub custom: Vec<CustomCheck>,
    pub children: Children,
    pub allow_extra_keys: bool,
    pub delete_extra_keys: bool,
    pub default_on_invalid: bool,
    pub delete_on_invalid: bool,
    pub throw_on_invalid: bool,
    /// The raw definition this node came from, handed to computed defaults
    pub def: Definition,
}

pub(crate) fn normalize(def: &Definition) -> SchemaResult<Node> {
    let kind = def.kind.unwrap_or(Kind::Any);

    let regex = match &def.regex {
        Some(pattern) => Some(Regex::new(pattern).map_err(|source| {
            SchemaError::InvalidRegex {
                name: def.name.clone().unwrap_or_default(),
                pattern: pattern.clone(),
                source,
            }
        })?),
        None => None,
    };

    let children = match (kind, &def.schema) {
        (_, None) => Children::None,
        (Kind::IndexObject, Some(ChildSchema::Fields(fields))) => {
            // an indexObject given a field list validates every entry as an
            // object with those fields, inheriting the extra-key policy
            let mut synthetic = Definition::object(fields.clone());
            synthetic.allow_extra_keys = def.allow_extra_keys;
            synthetic.delete_extra_keys = def.delete_extra_keys;
            Children::Uniform(Box::new(normalize(&synthetic)?))
        }
        (Kind::Object, Some(ChildSchema::Fields(fields))) => {
            Children::Fields(normalize_fields(fields)?)
        }
        (Kind::Object, Some(ChildSchema::Node(node))) => {
            Children::Fields(normalize_fields(std::slice::from_ref(node.as_ref()))?)
        }
        (_, Some(ChildSchema::Node(node))) => Children::Uniform(Box::new(normalize(node)?)),
        (_, Some(ChildSchema::Fields(fields))) => match fields.first() {
            // a uniform position handed a list: the first entry wins
            Some(first) => Children::Uniform(Box::new(normalize(first)?)),
            None => Children::None,
        },
    };

    Ok(Node {
        kind,
        name: def.name.clone(),
        required: def.required.unwrap_or(false),
        default: def.default.clone(),
        enum_values: def.enum_values.clone(),
        min: def.min,
        max: def.max,
        regex,
        class: def.class.clone(),
        custom: def.custom.clone(),
        children,
        allow_extra_keys: def.allow_extra_keys.unwrap_or(true),
        delete_extra_keys: def.delete_extra_keys.unwrap_or(false),
        default_on_invalid: def.default_on_invalid.unwrap_or(false),
        delete_on_invalid: def.delete_on_invalid.unwrap_or(false),
        throw_on_invalid: def.throw_on_invalid.unwrap_or(false),
        def: def.clone(),
    })
}

fn normalize_fields(fields: &[Definition]) -> SchemaResult<Vec<Node>> {
    fields
        .iter()
        .map(|field| {
            if field.name.is_none() {
                return Err(SchemaError::Malformed {
                    path: String::new(),
                    reason: "object field schema is missing a 'name'".into(),
                });
            }
            normalize(field)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_filled() {
        let node = normalize(&Definition::string()).unwrap();
        assert_eq!(node.kind, Kind::String);
        assert!(!node.required);
        assert!(node.allow_extra_keys);
        assert!(!node.delete_extra_keys);
        assert!(!node.default_on_invalid);
        assert!(!node.delete_on_invalid);
        assert!(!node.throw_on_invalid);
    }

    #[test]
    fn test_missing_kind_means_any() {
        let node = normalize(&Definition::default()).unwrap();
        assert_eq!(node.kind, Kind::Any);
    }

    #[test]
    fn test_object_field_list_stays_field_list() {
        let def = Definition::object(vec![
            Definition::string().named("foo"),
            Definition::number().named("bar"),
        ]);
        let node = normalize(&def).unwrap();
        match node.children {
            Children::Fields(fields) => assert_eq!(fields.len(), 2),
            _ => panic!("expected field list"),
        }
    }

    #[test]
    fn test_index_object_field_list_becomes_uniform_object() {
        let def = Definition::index_object_fields(vec![Definition::string().named("foo")])
            .delete_extra_keys(true);
        let node = normalize(&def).unwrap();
        match node.children {
            Children::Uniform(child) => {
                assert_eq!(child.kind, Kind::Object);
                assert!(child.delete_extra_keys);
                assert!(matches!(child.children, Children::Fields(ref f) if f.len() == 1));
            }
            _ => panic!("expected uniform child"),
        }
    }

    #[test]
    fn test_array_child_stays_uniform() {
        let node = normalize(&Definition::array(Definition::number())).unwrap();
        match node.children {
            Children::Uniform(child) => assert_eq!(child.kind, Kind::Number),
            _ => panic!("expected uniform child"),
        }
    }

    #[test]
    fn test_unnamed_object_field_rejected() {
        let def = Definition::object(vec![Definition::string()]);
        assert!(matches!(
            normalize(&def),
            Err(SchemaError::Malformed { .. })
        ));
    }

    #[test]
    fn test_bad_regex_rejected() {
        let def = Definition::string().named("foo").regex("(unclosed");
        match normalize(&def) {
            Err(SchemaError::InvalidRegex { name, pattern, .. }) => {
                assert_eq!(name, "foo");
                assert_eq!(pattern, "(unclosed");
            }
            other => panic!("expected regex error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_normalize_does_not_mutate_definition() {
        let def = Definition::index_object_fields(vec![Definition::string().named("foo")]);
        normalize(&def).unwrap();
        // the raw definition still carries its original field-list shape
        assert!(matches!(def.schema, Some(ChildSchema::Fields(ref f)) if f.len() == 1));
    }
}

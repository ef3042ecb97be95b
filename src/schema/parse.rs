//! JSON schema descriptions
//!
//! The data-driven subset of the schema language (everything except
//! computed defaults and custom checks) can be written as JSON and parsed
//! into a [`Definition`]. This is where an unsupported type tag surfaces:
//! it is a developer error naming the tag and the schema path, raised
//! unconditionally, never a validation error.

use serde_json::Value as JsonValue;

use super::types::{ChildSchema, DefaultSpec, Definition, Kind};
use crate::errors::{SchemaError, SchemaResult};
use crate::value::Value;

impl Definition {
    /// Parses a JSON schema description.
    ///
    /// Recognized keys: `type`, `name`, `required`, `default`, `enum`,
    /// `min`, `max`, `regex`, `class`, `schema`, `allowExtraKeys`,
    /// `deleteExtraKeys`, `defaultOnInvalid`, `deleteOnInvalid`,
    /// `throwOnInvalid`. Unrecognized keys are ignored.
    pub fn from_json(spec: &JsonValue) -> SchemaResult<Definition> {
        parse_node(spec, &mut Vec::new())
    }
}

fn parse_node(spec: &JsonValue, path: &mut Vec<String>) -> SchemaResult<Definition> {
    let obj = spec.as_object().ok_or_else(|| SchemaError::Malformed {
        path: join(path),
        reason: format!("expected a schema object, found {}", spec),
    })?;

    let mut def = Definition::default();

    if let Some(tag) = obj.get("type") {
        let tag = expect_str(tag, path, "type")?;
        def.kind = Some(Kind::from_tag(tag).ok_or_else(|| SchemaError::UnsupportedType {
            path: phrase(path),
            tag: tag.to_string(),
        })?);
    }
    if let Some(name) = obj.get("name") {
        def.name = Some(expect_str(name, path, "name")?.to_string());
    }
    if let Some(required) = obj.get("required") {
        def.required = Some(expect_bool(required, path, "required")?);
    }
    if let Some(default) = obj.get("default") {
        def.default = Some(DefaultSpec::Literal(Value::from_json(default)));
    }
    if let Some(values) = obj.get("enum") {
        let list = values.as_array().ok_or_else(|| malformed(path, "'enum' must be an array"))?;
        let mut enum_values = Vec::with_capacity(list.len());
        for value in list {
            enum_values.push(expect_str(value, path, "enum")?.to_string());
        }
        def.enum_values = Some(enum_values);
    }
    if let Some(min) = obj.get("min") {
        def.min = Some(expect_len(min, path, "min")?);
    }
    if let Some(max) = obj.get("max") {
        def.max = Some(expect_len(max, path, "max")?);
    }
    if let Some(regex) = obj.get("regex") {
        def.regex = Some(expect_str(regex, path, "regex")?.to_string());
    }
    if let Some(class) = obj.get("class") {
        def.class = Some(expect_str(class, path, "class")?.to_string());
    }
    if let Some(allow) = obj.get("allowExtraKeys") {
        def.allow_extra_keys = Some(expect_bool(allow, path, "allowExtraKeys")?);
    }
    if let Some(delete) = obj.get("deleteExtraKeys") {
        def.delete_extra_keys = Some(expect_bool(delete, path, "deleteExtraKeys")?);
    }
    if let Some(enable) = obj.get("defaultOnInvalid") {
        def.default_on_invalid = Some(expect_bool(enable, path, "defaultOnInvalid")?);
    }
    if let Some(enable) = obj.get("deleteOnInvalid") {
        def.delete_on_invalid = Some(expect_bool(enable, path, "deleteOnInvalid")?);
    }
    if let Some(enable) = obj.get("throwOnInvalid") {
        def.throw_on_invalid = Some(expect_bool(enable, path, "throwOnInvalid")?);
    }

    if let Some(schema) = obj.get("schema") {
        def.schema = Some(match schema {
            JsonValue::Array(fields) => {
                let mut parsed = Vec::with_capacity(fields.len());
                for field in fields {
                    let name = field
                        .get("name")
                        .and_then(JsonValue::as_str)
                        .unwrap_or("?")
                        .to_string();
                    path.push(name);
                    let result = parse_node(field, path);
                    path.pop();
                    parsed.push(result?);
                }
                ChildSchema::Fields(parsed)
            }
            _ => {
                path.push("schema".to_string());
                let result = parse_node(schema, path);
                path.pop();
                ChildSchema::Node(Box::new(result?))
            }
        });
    }

    Ok(def)
}

fn expect_str<'a>(value: &'a JsonValue, path: &[String], key: &str) -> SchemaResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| malformed(path, &format!("'{}' must be a string", key)))
}

fn expect_bool(value: &JsonValue, path: &[String], key: &str) -> SchemaResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| malformed(path, &format!("'{}' must be a boolean", key)))
}

fn expect_len(value: &JsonValue, path: &[String], key: &str) -> SchemaResult<usize> {
    value
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| malformed(path, &format!("'{}' must be a non-negative integer", key)))
}

fn malformed(path: &[String], reason: &str) -> SchemaError {
    SchemaError::Malformed {
        path: join(path),
        reason: reason.to_string(),
    }
}

fn join(path: &[String]) -> String {
    path.join(".")
}

fn phrase(path: &[String]) -> String {
    if path.is_empty() {
        " ".to_string()
    } else {
        format!(" '{}' ", join(path))
    }
}

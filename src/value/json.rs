//! serde_json interop
//!
//! JSON is the usual source of values to validate, so conversions in both
//! directions live here. Dates serialize as RFC 3339 strings; functions and
//! instances have no JSON form and make `to_json` return `None`, as does a
//! cyclic value.

use std::rc::Rc;

use serde_json::{Map as JsonMap, Value as JsonValue};

use super::Value;

impl Value {
    /// Converts a JSON value into a runtime value.
    ///
    /// Numbers become `f64`; objects keep their key order.
    pub fn from_json(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(items) => {
                Value::array(items.iter().map(Value::from_json).collect())
            }
            JsonValue::Object(map) => Value::object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v))),
            ),
        }
    }

    /// Converts back to JSON, or `None` if the value contains something
    /// JSON cannot represent (a function, an instance, a cycle).
    pub fn to_json(&self) -> Option<JsonValue> {
        let mut branch = Vec::new();
        to_json_inner(self, &mut branch)
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        Value::from_json(&json)
    }
}

fn to_json_inner(value: &Value, branch: &mut Vec<usize>) -> Option<JsonValue> {
    match value {
        Value::Null => Some(JsonValue::Null),
        Value::Bool(b) => Some(JsonValue::Bool(*b)),
        Value::Number(n) => {
            // integral numbers serialize as JSON integers so round-trips
            // compare equal
            if n.is_finite() && n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 {
                Some(JsonValue::Number(serde_json::Number::from(*n as i64)))
            } else {
                serde_json::Number::from_f64(*n).map(JsonValue::Number)
            }
        }
        Value::String(s) => Some(JsonValue::String(s.clone())),
        Value::Date(dt) => Some(JsonValue::String(dt.to_rfc3339())),
        Value::Function(_) | Value::Instance(_) => None,
        Value::Array(items) => {
            let id = Rc::as_ptr(items) as usize;
            if branch.contains(&id) {
                return None;
            }
            branch.push(id);
            let result = items
                .borrow()
                .iter()
                .map(|item| to_json_inner(item, branch))
                .collect::<Option<Vec<_>>>()
                .map(JsonValue::Array);
            branch.pop();
            result
        }
        Value::Object(map) => {
            let id = Rc::as_ptr(map) as usize;
            if branch.contains(&id) {
                return None;
            }
            branch.push(id);
            let mut out = JsonMap::new();
            let mut ok = true;
            for (key, entry) in map.borrow().iter() {
                match to_json_inner(entry, branch) {
                    Some(json) => {
                        out.insert(key.clone(), json);
                    }
                    None => {
                        ok = false;
                        break;
                    }
                }
            }
            branch.pop();
            ok.then(|| JsonValue::Object(out))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip() {
        let json = json!({
            "name": "Alice",
            "age": 30,
            "tags": ["a", "b"],
            "active": true,
            "note": null
        });
        let value = Value::from_json(&json);
        assert_eq!(value.to_json(), Some(json));
    }

    #[test]
    fn test_function_has_no_json_form() {
        let value = Value::object(vec![(
            "callback".to_string(),
            Value::function(|_| Value::Null),
        )]);
        assert_eq!(value.to_json(), None);
    }

    #[test]
    fn test_cycle_has_no_json_form() {
        let value = Value::from_json(&json!({ "foo": 1 }));
        if let Value::Object(map) = &value {
            map.borrow_mut().insert("circle".into(), value.clone());
        }
        assert_eq!(value.to_json(), None);
    }

    #[test]
    fn test_date_serializes_as_rfc3339() {
        use chrono::TimeZone;
        let dt = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let value = Value::from(dt);
        assert_eq!(value.to_json(), Some(json!("2024-05-01T12:00:00+00:00")));
    }
}

//! Bridges between [`Value`] and `serde_json`.

use serde_json::{Map, json};

use crate::value::{Number, Object, Payload, Value};

/// Convert to a `serde_json::Value`.
///
/// Numbers that `serde_json` cannot hold exactly fall back to the nearest
/// float, or to null if even that fails.
pub fn to_serde(value: &Value) -> serde_json::Value {
    match &value.payload {
        Payload::Null => serde_json::Value::Null,
        Payload::Bool(b) => serde_json::Value::Bool(*b),
        Payload::Number(n) => match n.as_str().parse::<serde_json::Number>() {
            Ok(n) => serde_json::Value::Number(n),
            Err(_) => serde_json::Number::from_f64(n.as_f64())
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        },
        Payload::String(s) => serde_json::Value::String(s.clone()),
        Payload::Array(arr) => serde_json::Value::Array(arr.iter().map(to_serde).collect()),
        Payload::Object(obj) => serde_json::Value::Object(
            obj.iter()
                .map(|(key, value)| (key.to_string(), to_serde(value)))
                .collect(),
        ),
    }
}

/// Convert from a `serde_json::Value`. The result has no spans.
pub fn from_serde(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::null(),
        serde_json::Value::Bool(b) => Value::bool(*b),
        serde_json::Value::Number(n) => match Number::parse(&n.to_string()) {
            Some(n) => Value::number(n),
            None => Value::null(),
        },
        serde_json::Value::String(s) => Value::string(s.as_str()),
        serde_json::Value::Array(items) => Value::array(items.iter().map(from_serde).collect()),
        serde_json::Value::Object(map) => {
            let mut object = Object::default();
            for (key, value) in map {
                object.insert(key.as_str(), from_serde(value));
            }
            Value {
                payload: Payload::Object(object),
                span: None,
            }
        }
    }
}

/// Convert to the tagged representation used at language boundaries:
/// `{"tag": "jv-number", "value": "123"}`.
///
/// Tags are `jv-null`, `jv-boolean`, `jv-number`, `jv-string`, `jv-array`
/// and `jv-object`. Numbers keep their text; `jv-null` has no `value`.
pub fn to_json_value(value: &Value) -> serde_json::Value {
    match &value.payload {
        Payload::Null => json!({ "tag": "jv-null" }),
        Payload::Bool(b) => json!({ "tag": "jv-boolean", "value": b }),
        Payload::Number(n) => json!({ "tag": "jv-number", "value": n.as_str() }),
        Payload::String(s) => json!({ "tag": "jv-string", "value": s }),
        Payload::Array(arr) => {
            let items: Vec<_> = arr.iter().map(to_json_value).collect();
            json!({ "tag": "jv-array", "value": items })
        }
        Payload::Object(obj) => {
            let mut map = Map::new();
            for (key, value) in obj.iter() {
                map.insert(key.to_string(), to_json_value(value));
            }
            json!({ "tag": "jv-object", "value": map })
        }
    }
}

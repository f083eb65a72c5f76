//! Decoder: [`Value`] → dynamic `serde_json::Value`.
//!
//! The output is the language-agnostic graph an external serializer consumes.
//! Null containers decode to JSON null; empty containers decode to `{}` and
//! `[]`, so the distinction made by the encoders survives.

use crate::value::Value;
use serde_json::{Map, Number, Value as Json};

/// Decode an intermediate tree into a dynamic JSON value.
///
/// Total: every tree decodes. Integers become integral JSON numbers, floats
/// become floating JSON numbers (non-finite floats, which JSON cannot hold,
/// become null).
///
/// ```
/// use jsonir_core::{decode, Array, Object, Value};
/// use serde_json::json;
///
/// assert_eq!(decode(&Value::Object(Object::null())), json!(null));
/// assert_eq!(decode(&Value::Array(Array::default())), json!([]));
/// ```
pub fn decode(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Integer(i) => Json::Number(Number::from(*i)),
        Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::Boolean(b) => Json::Bool(*b),
        Value::Text(s) => Json::String(s.clone()),
        Value::Object(obj) if obj.is_null() => Json::Null,
        Value::Object(obj) => {
            let map: Map<String, Json> = obj
                .iter()
                .map(|(key, child)| (key.to_string(), decode(child)))
                .collect();
            Json::Object(map)
        }
        Value::Array(arr) if arr.is_null() => Json::Null,
        Value::Array(arr) => Json::Array(arr.iter().map(decode).collect()),
    }
}

/// Decode and render as compact JSON text.
///
/// # Errors
///
/// Propagates serializer failures as [`JsonIrError::JsonParse`](crate::JsonIrError::JsonParse).
pub fn to_json_string(value: &Value) -> crate::Result<String> {
    Ok(serde_json::to_string(&decode(value))?)
}

/// Decode and render as indented JSON text.
///
/// # Errors
///
/// Propagates serializer failures as [`JsonIrError::JsonParse`](crate::JsonIrError::JsonParse).
pub fn to_json_string_pretty(value: &Value) -> crate::Result<String> {
    Ok(serde_json::to_string_pretty(&decode(value))?)
}

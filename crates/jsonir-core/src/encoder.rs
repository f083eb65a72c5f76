//! Structural encoder: native value → [`Value`], no schema.
//!
//! The output mirrors the native value's own shape. Records are encoded
//! through their field tables (names, `omitempty`, `string`), mappings by
//! their text keys, sequences element by element.
//!
//! # Example
//! ```
//! use jsonir_core::{decode, encode};
//! use std::collections::HashMap;
//!
//! let scores: HashMap<&str, Vec<i32>> = HashMap::from([("ada", vec![95, 87])]);
//! let value = encode(&scores);
//! assert_eq!(decode(&value), serde_json::json!({"ada": [95, 87]}));
//! ```

use crate::native::{present_fields, NativeMap, NativeSeq, NativeView, Record, Reflect};
use crate::value::{format_float, Array, Object, Value};
use log::trace;

/// Encode a native value without a schema.
///
/// Never fails: kinds that cannot be represented encode as [`Value::Null`].
/// A missing map or sequence (`None::<HashMap<..>>`, `None::<Vec<..>>`)
/// encodes as a null object or array, distinct from an empty one.
/// Unsigned integers above `i64::MAX` wrap when narrowed to
/// [`Value::Integer`].
pub fn encode<T: Reflect + ?Sized>(value: &T) -> Value {
    encode_view(value.view())
}

fn encode_view(view: NativeView<'_>) -> Value {
    match view {
        NativeView::Nil => Value::Null,
        NativeView::Bool(b) => Value::Boolean(b),
        NativeView::Signed(i) => Value::Integer(i),
        NativeView::Unsigned(u) => Value::Integer(u as i64),
        NativeView::Float(f) => Value::Float(f),
        NativeView::Text(s) => Value::Text(s.to_string()),
        NativeView::Record(record) => Value::Object(encode_record(record)),
        NativeView::Map(map) => Value::Object(encode_map(map)),
        NativeView::Seq(seq) => Value::Array(encode_seq(seq)),
        NativeView::NullMap => Value::Object(Object::null()),
        NativeView::NullSeq => Value::Array(Array::null()),
        NativeView::Unsupported => {
            trace!("unsupported native value encoded as null");
            Value::Null
        }
    }
}

fn encode_record(record: &dyn Record) -> Object {
    present_fields(record)
        .map(|(spec, field)| {
            let value = if spec.options().quoted {
                quote(encode(field))
            } else {
                encode(field)
            };
            (spec.name().to_string(), value)
        })
        .collect()
}

/// Fields tagged `string` carry booleans and numbers as text.
fn quote(value: Value) -> Value {
    match value {
        Value::Boolean(b) => Value::Text(b.to_string()),
        Value::Integer(i) => Value::Text(i.to_string()),
        Value::Float(f) => Value::Text(format_float(f)),
        other => other,
    }
}

fn encode_map(map: &dyn NativeMap) -> Object {
    map.entries()
        .filter_map(|(key, value)| match key {
            NativeView::Text(key) => Some((key.to_string(), encode(value))),
            other => {
                trace!("skipping map key of kind {}", other.kind_name());
                None
            }
        })
        .collect()
}

fn encode_seq(seq: &dyn NativeSeq) -> Array {
    (0..seq.len())
        .map(|index| seq.get(index).map_or(Value::Null, encode))
        .collect()
}

//! Schema-directed encoder: native value + [`Type`] → [`Value`].
//!
//! The schema decides the shape of the output; the native value only supplies
//! data. Scalars are coerced across kinds where that is lossless enough to be
//! useful (numbers sent as text, floats into integer fields), objects carry
//! exactly the schema's fields, and anything that does not fit degrades to
//! [`Value::Null`] at that position while the rest of the tree still encodes.
//!
//! | schema   | accepted native kinds                         |
//! |----------|-----------------------------------------------|
//! | `Bool`   | bool, boolean literal text                    |
//! | `Long`   | any integer, float (floored), base-10 text    |
//! | `Double` | any integer, float, float text                |
//! | `String` | any integer, float, text                      |
//! | `Object` | record, text-keyed mapping                    |
//! | `Array`  | sequence                                      |

use crate::native::{present_fields, NativeMap, NativeSeq, NativeView, Record, Reflect};
use crate::schema::{ArrayType, ObjectType, Type};
use crate::value::{format_float, Array, Object, Value};
use log::debug;

/// Encode `value` so that it conforms to `ty`.
///
/// Never fails. A native value whose kind cannot be coerced to the schema
/// kind encodes as [`Value::Null`]; inside an object this leaves the field
/// present with a null value.
///
/// ```
/// use jsonir_core::{encode_by_type, Type, Value};
///
/// assert_eq!(encode_by_type("42", &Type::Long), Value::Integer(42));
/// assert_eq!(encode_by_type(&42, &Type::String), Value::Text("42".into()));
/// assert_eq!(encode_by_type("yes", &Type::Bool), Value::Null);
/// ```
pub fn encode_by_type<T: Reflect + ?Sized>(value: &T, ty: &Type) -> Value {
    encode_view(value.view(), ty)
}

fn encode_field(value: &dyn Reflect, ty: Option<&Type>) -> Value {
    match ty {
        Some(ty) => encode_view(value.view(), ty),
        None => Value::Null,
    }
}

fn encode_view(view: NativeView<'_>, ty: &Type) -> Value {
    if let NativeView::Nil | NativeView::NullMap | NativeView::NullSeq = view {
        return Value::Null;
    }
    let encoded = match ty {
        Type::Bool => encode_bool(view),
        Type::Long => encode_long(view),
        Type::Double => encode_double(view),
        Type::String => encode_string(view),
        Type::Object(obj) => match view {
            NativeView::Record(record) => Some(encode_record(record, obj)),
            NativeView::Map(map) => Some(encode_map(map, obj)),
            _ => None,
        },
        Type::Array(arr) => match view {
            NativeView::Seq(seq) => Some(encode_seq(seq, arr)),
            _ => None,
        },
    };
    encoded.unwrap_or_else(|| {
        debug!("cannot encode {} as {}", view.kind_name(), ty.kind());
        Value::Null
    })
}

fn encode_bool(view: NativeView<'_>) -> Option<Value> {
    match view {
        NativeView::Bool(b) => Some(Value::Boolean(b)),
        NativeView::Text(s) => parse_bool(s).map(Value::Boolean),
        _ => None,
    }
}

fn encode_long(view: NativeView<'_>) -> Option<Value> {
    match view {
        NativeView::Signed(i) => Some(Value::Integer(i)),
        NativeView::Unsigned(u) => Some(Value::Integer(u as i64)),
        // Saturates outside the i64 range; NaN becomes 0.
        NativeView::Float(f) => Some(Value::Integer(f.floor() as i64)),
        NativeView::Text(s) => s.parse::<i64>().ok().map(Value::Integer),
        _ => None,
    }
}

fn encode_double(view: NativeView<'_>) -> Option<Value> {
    match view {
        NativeView::Signed(i) => Some(Value::Float(i as f64)),
        NativeView::Unsigned(u) => Some(Value::Float(u as f64)),
        NativeView::Float(f) => Some(Value::Float(f)),
        NativeView::Text(s) => s.parse::<f64>().ok().map(Value::Float),
        _ => None,
    }
}

fn encode_string(view: NativeView<'_>) -> Option<Value> {
    match view {
        NativeView::Signed(i) => Some(Value::Text(i.to_string())),
        NativeView::Unsigned(u) => Some(Value::Text(u.to_string())),
        NativeView::Float(f) => Some(Value::Text(format_float(f))),
        NativeView::Text(s) => Some(Value::Text(s.to_string())),
        _ => None,
    }
}

/// Every schema field is emitted: from the record field with the same encoded
/// name when there is one, as null otherwise. `omitempty` fields holding their
/// zero value count as missing.
fn encode_record(record: &dyn Record, schema: &ObjectType) -> Value {
    let present: Vec<_> = present_fields(record).collect();
    let fields = schema
        .fields()
        .map(|(name, ty)| {
            let value = present
                .iter()
                .find(|(spec, _)| spec.name() == name)
                .map_or(Value::Null, |(_, field)| encode_field(*field, ty));
            (name.to_string(), value)
        })
        .collect();
    Value::Object(fields)
}

fn encode_map(map: &dyn NativeMap, schema: &ObjectType) -> Value {
    let fields = schema
        .fields()
        .map(|(name, ty)| {
            let value = map
                .lookup(name)
                .map_or(Value::Null, |field| encode_field(field, ty));
            (name.to_string(), value)
        })
        .collect::<Object>();
    Value::Object(fields)
}

fn encode_seq(seq: &dyn NativeSeq, schema: &ArrayType) -> Value {
    let items = (0..seq.len())
        .map(|index| match seq.get(index) {
            Some(item) => encode_field(item, schema.element()),
            None => Value::Null,
        })
        .collect::<Array>();
    Value::Array(items)
}

/// Boolean literals: `1 t T TRUE true True` and `0 f F FALSE false False`.
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_literals() {
        for s in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(s), Some(true), "{s}");
        }
        for s in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(s), Some(false), "{s}");
        }
    }

    #[test]
    fn parse_bool_rejects_other_text() {
        for s in ["", "yes", "no", "tRUE", " true", "2"] {
            assert_eq!(parse_bool(s), None, "{s:?}");
        }
    }

    #[test]
    fn long_floors_floats() {
        assert_eq!(encode_long(NativeView::Float(2.9)), Some(Value::Integer(2)));
        assert_eq!(encode_long(NativeView::Float(-2.1)), Some(Value::Integer(-3)));
    }

    #[test]
    fn long_parses_signed_decimal_text() {
        assert_eq!(encode_long(NativeView::Text("+17")), Some(Value::Integer(17)));
        assert_eq!(encode_long(NativeView::Text("-17")), Some(Value::Integer(-17)));
        assert_eq!(encode_long(NativeView::Text("0x11")), None);
        assert_eq!(encode_long(NativeView::Text("1.5")), None);
        assert_eq!(encode_long(NativeView::Text("9223372036854775808")), None);
    }

    #[test]
    fn string_rejects_bool() {
        assert_eq!(encode_string(NativeView::Bool(true)), None);
    }
}

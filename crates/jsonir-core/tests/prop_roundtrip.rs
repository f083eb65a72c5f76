/// Property-based tests for the value model.
///
/// Uses the `proptest` crate to generate random JSON documents, schemas and
/// records and verify:
/// - `decode(encode(doc)) == doc` for any JSON document;
/// - a type survives being written as a descriptor and parsed back;
/// - the schema-directed encoder never panics and always yields the shape
///   the schema names;
/// - scalar coercions agree with the text representation of the value.
///
/// Unsigned integers above `i64::MAX` are excluded: they wrap when encoded.
use jsonir_core::{
    build_type, decode, encode, encode_by_type, parse_type, record, ArrayType, Kind, ObjectType,
    Type, Value,
};
use proptest::prelude::*;
use serde::Deserialize;
use serde_json::{json, Map, Number};

// ============================================================================
// Strategies
// ============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,11}").unwrap()
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,20}",
        Just(String::new()),
        Just("true".to_string()),
        Just("42".to_string()),
        Just("-1.5".to_string()),
        Just("caf\u{00e9}".to_string()),
        Just("line1\nline2".to_string()),
    ]
}

fn arb_number() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        3 => any::<i64>().prop_map(|n| serde_json::Value::Number(Number::from(n))),
        1 => (0u64..=i64::MAX as u64).prop_map(|n| serde_json::Value::Number(Number::from(n))),
        2 => (-1.0e12f64..1.0e12f64)
            .prop_filter_map("finite", Number::from_f64)
            .prop_map(serde_json::Value::Number),
    ]
}

fn arb_primitive() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        arb_text().prop_map(serde_json::Value::String),
        arb_number(),
        any::<bool>().prop_map(serde_json::Value::Bool),
        Just(serde_json::Value::Null),
    ]
}

fn arb_document_inner(depth: u32) -> BoxedStrategy<serde_json::Value> {
    if depth == 0 {
        arb_primitive().boxed()
    } else {
        prop_oneof![
            4 => arb_primitive(),
            2 => prop::collection::vec((arb_key(), arb_document_inner(depth - 1)), 0..5)
                .prop_map(|pairs| serde_json::Value::Object(pairs.into_iter().collect::<Map<_, _>>())),
            2 => prop::collection::vec(arb_document_inner(depth - 1), 0..5)
                .prop_map(serde_json::Value::Array),
        ]
        .boxed()
    }
}

/// Random JSON documents up to 3 levels deep.
fn arb_document() -> impl Strategy<Value = serde_json::Value> {
    arb_document_inner(3)
}

fn arb_scalar_type() -> impl Strategy<Value = Type> {
    prop_oneof![
        Just(Type::Long),
        Just(Type::Double),
        Just(Type::Bool),
        Just(Type::String),
    ]
}

fn arb_type_inner(depth: u32) -> BoxedStrategy<Type> {
    if depth == 0 {
        arb_scalar_type().boxed()
    } else {
        prop_oneof![
            3 => arb_scalar_type(),
            1 => prop::collection::vec(
                (arb_key(), prop::option::of(arb_type_inner(depth - 1))),
                0..4,
            )
            .prop_map(|fields| {
                let mut obj = ObjectType::new();
                for (name, ty) in fields {
                    obj.set(name, ty);
                }
                Type::Object(obj)
            }),
            1 => prop::option::of(arb_type_inner(depth - 1))
                .prop_map(|element| Type::Array(ArrayType::new(element))),
        ]
        .boxed()
    }
}

/// Random types up to 3 levels deep, including untyped fields and
/// element-less arrays.
fn arb_type() -> impl Strategy<Value = Type> {
    arb_type_inner(3)
}

// ============================================================================
// Helpers
// ============================================================================

/// True when `value` has the shape `ty` names: scalars carry the matching
/// kind or null, containers are null or recurse.
fn conforms(value: &Value, ty: &Type) -> bool {
    if value.is_nil() {
        return true;
    }
    match ty {
        Type::Object(obj) => value.as_object().is_some_and(|fields| {
            fields.len() == obj.len()
                && obj.fields().all(|(name, field_ty)| {
                    let field = fields.get(name).unwrap_or(&Value::Null);
                    field_ty.map_or(field.is_nil(), |field_ty| conforms(field, field_ty))
                })
        }),
        Type::Array(arr) => value.as_array().is_some_and(|items| {
            items.iter().all(|item| {
                arr.element()
                    .map_or(item.is_nil(), |element| conforms(item, element))
            })
        }),
        scalar => value.kind() == scalar.kind(),
    }
}

#[derive(Debug, PartialEq, Deserialize)]
struct Sample {
    id: i64,
    label: String,
    score: f64,
    active: bool,
    tags: Vec<String>,
    note: Option<String>,
}

record!(Sample { id, label, score, active, tags, note });

fn arb_sample() -> impl Strategy<Value = Sample> {
    (
        any::<i64>(),
        arb_text(),
        -1.0e9f64..1.0e9f64,
        any::<bool>(),
        prop::collection::vec(arb_text(), 0..4),
        prop::option::of(arb_text()),
    )
        .prop_map(|(id, label, score, active, tags, note)| Sample {
            id,
            label,
            score,
            active,
            tags,
            note,
        })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Core property: decode(encode(doc)) == doc for any JSON document.
    #[test]
    fn roundtrip_preserves_document(doc in arb_document()) {
        let encoded = encode(&doc);
        let decoded = decode(&encoded);
        prop_assert_eq!(&doc, &decoded, "encoded: {:?}", encoded);
    }

    /// The JSON text of the value tree is the JSON text of the decoded
    /// document.
    #[test]
    fn serialize_agrees_with_decode(doc in arb_document()) {
        let encoded = encode(&doc);
        prop_assert_eq!(serde_json::to_value(&encoded).unwrap(), decode(&encoded));
    }

    /// Records survive encode, decode, and deserialization back into the
    /// native type.
    #[test]
    fn roundtrip_record(sample in arb_sample()) {
        let decoded = decode(&encode(&sample));
        let back: Sample = serde_json::from_value(decoded).unwrap();
        prop_assert_eq!(sample, back);
    }

    /// A record encoded against its own schema matches the structural
    /// encoding.
    #[test]
    fn typed_record_matches_structural(sample in arb_sample()) {
        let ty = build_type(&json!({
            "id": "LONG",
            "label": "STRING",
            "score": "DOUBLE",
            "active": "BOOL",
            "tags": ["STRING"],
            "note": "STRING",
        }))
        .unwrap();
        prop_assert_eq!(encode_by_type(&sample, &ty), encode(&sample));
    }

    /// A type written as a descriptor parses back to itself.
    #[test]
    fn type_descriptor_roundtrip(ty in arb_type()) {
        let descriptor = ty.to_string();
        let parsed = parse_type(&descriptor).unwrap();
        prop_assert_eq!(ty, parsed, "descriptor: {}", descriptor);
    }

    /// Schema-directed encoding never panics and always conforms.
    #[test]
    fn typed_encoding_conforms(doc in arb_document(), ty in arb_type()) {
        let encoded = encode_by_type(&doc, &ty);
        prop_assert!(conforms(&encoded, &ty), "{:?} does not conform to {}", encoded, ty);
    }

    /// Integers coerce through their text form.
    #[test]
    fn long_from_text(n in any::<i64>()) {
        prop_assert_eq!(encode_by_type(&n.to_string(), &Type::Long), Value::Integer(n));
        prop_assert_eq!(encode_by_type(&n, &Type::String), Value::Text(n.to_string()));
    }

    /// Floats coerce to the floor for LONG, and through their text form for
    /// DOUBLE.
    #[test]
    fn double_coercions(f in -1.0e15f64..1.0e15f64) {
        prop_assert_eq!(encode_by_type(&f, &Type::Long), Value::Integer(f.floor() as i64));
        let text = encode_by_type(&f, &Type::String);
        prop_assert_eq!(text.kind(), Kind::String);
        let back = encode_by_type(&text.as_str().unwrap(), &Type::Double);
        prop_assert_eq!(back, Value::Float(f));
    }
}

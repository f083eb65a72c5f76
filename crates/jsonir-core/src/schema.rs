//! Type schemas: the shape a schema-directed encode must produce.
//!
//! A [`Type`] is built once from a *descriptor*, a nested value of type-name
//! tokens, mappings and sequences:
//!
//! ```
//! use jsonir_core::{build_type, Kind};
//! use serde_json::json;
//!
//! let ty = build_type(&json!({
//!     "name": "STRING",
//!     "scores": ["LONG"],
//!     "owner": {"id": "LONG", "admin": "BOOL"},
//! }))
//! .unwrap();
//!
//! let obj = ty.as_object().unwrap();
//! assert_eq!(obj.get("scores").map(|t| t.kind()), Some(Kind::Array));
//! assert_eq!(obj.get("missing"), None);
//! ```
//!
//! Types serialize back to their descriptor, and deserialize from one.

use crate::error::{JsonIrError, Result};
use crate::native::{NativeView, Reflect};
use crate::value::Kind;
use log::{debug, trace};
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A value shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Long,
    Double,
    Bool,
    String,
    Object(ObjectType),
    Array(ArrayType),
}

impl Type {
    pub fn kind(&self) -> Kind {
        match self {
            Type::Long => Kind::Long,
            Type::Double => Kind::Double,
            Type::Bool => Kind::Bool,
            Type::String => Kind::String,
            Type::Object(_) => Kind::Object,
            Type::Array(_) => Kind::Array,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            Type::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectType> {
        match self {
            Type::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayType> {
        match self {
            Type::Array(arr) => Some(arr),
            _ => None,
        }
    }
}

/// Object shape: field name → field type.
///
/// A field may be declared without a usable type (its descriptor named no
/// type). Such a field is still part of the shape and always encodes as null.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectType {
    fields: BTreeMap<String, Option<Type>>,
}

impl ObjectType {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare or redeclare a field.
    pub fn set(&mut self, name: impl Into<String>, ty: impl Into<Option<Type>>) {
        self.fields.insert(name.into(), ty.into());
    }

    /// Builder form of [`set`](Self::set).
    pub fn with_field(mut self, name: impl Into<String>, ty: impl Into<Option<Type>>) -> Self {
        self.set(name, ty);
        self
    }

    /// Type of field `name`. `None` both for undeclared fields and for fields
    /// declared without a type; either way the field encodes as null.
    pub fn get(&self, name: &str) -> Option<&Type> {
        self.fields.get(name)?.as_ref()
    }

    /// Whether `name` is part of the shape.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&Type>)> + '_ {
        self.fields
            .iter()
            .map(|(name, ty)| (name.as_str(), ty.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Homogeneous array shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayType {
    element: Option<Box<Type>>,
}

impl ArrayType {
    pub fn new(element: impl Into<Option<Type>>) -> Self {
        Self {
            element: element.into().map(Box::new),
        }
    }

    /// Element type. `None` when the descriptor sequence was empty, in which
    /// case no element can be encoded.
    pub fn element(&self) -> Option<&Type> {
        self.element.as_deref()
    }
}

/// Build a type from a descriptor.
///
/// - `"LONG"`, `"DOUBLE"`, `"BOOL"`, `"STRING"` name the scalar types (case
///   sensitive); any other text names no type;
/// - a mapping becomes an object type with one field per text key; a null
///   mapping becomes an object type without fields;
/// - a sequence becomes an array type whose element type is built from the
///   first element; the remaining elements are ignored; an empty or null
///   sequence leaves the element type unset;
/// - anything else names no type.
pub fn build_type<T: Reflect + ?Sized>(descriptor: &T) -> Option<Type> {
    match descriptor.view() {
        NativeView::Text(token) => scalar_type(token),
        NativeView::Map(map) => {
            let mut obj = ObjectType::new();
            for (key, field) in map.entries() {
                match key {
                    NativeView::Text(name) => obj.set(name, build_type(field)),
                    other => trace!("skipping descriptor key of kind {}", other.kind_name()),
                }
            }
            Some(Type::Object(obj))
        }
        NativeView::Seq(seq) => {
            let element = seq.get(0).and_then(build_type);
            Some(Type::Array(ArrayType::new(element)))
        }
        NativeView::NullMap => Some(Type::Object(ObjectType::new())),
        NativeView::NullSeq => Some(Type::Array(ArrayType::new(None::<Type>))),
        other => {
            debug!("descriptor of kind {} names no type", other.kind_name());
            None
        }
    }
}

fn scalar_type(token: &str) -> Option<Type> {
    match token {
        "LONG" => Some(Type::Long),
        "DOUBLE" => Some(Type::Double),
        "BOOL" => Some(Type::Bool),
        "STRING" => Some(Type::String),
        other => {
            debug!("unknown type name {other:?}");
            None
        }
    }
}

/// Parse a JSON descriptor and build its type.
///
/// # Errors
///
/// Returns [`JsonIrError::JsonParse`] for malformed JSON and
/// [`JsonIrError::InvalidSchema`] when the descriptor names no type.
pub fn parse_type(json: &str) -> Result<Type> {
    let descriptor: serde_json::Value = serde_json::from_str(json)?;
    build_type(&descriptor).ok_or_else(|| JsonIrError::InvalidSchema(no_type_reason(&descriptor)))
}

fn no_type_reason(descriptor: &serde_json::Value) -> String {
    match descriptor {
        serde_json::Value::String(token) => format!("unknown type name {token:?}"),
        other => format!("expected a type name, object or array, found {other}"),
    }
}

// ============================================================================
// Descriptor (de)serialization
// ============================================================================

/// Writes the descriptor the type was built from (normalized: array
/// descriptors keep only their element type, untyped fields become `null`).
impl Serialize for Type {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Type::Object(obj) => {
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (name, ty) in obj.fields() {
                    map.serialize_entry(name, &ty)?;
                }
                map.end()
            }
            Type::Array(arr) => {
                let element = arr.element();
                let mut seq = serializer.serialize_seq(Some(usize::from(element.is_some())))?;
                if let Some(element) = element {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            scalar => serializer.serialize_str(scalar.kind().as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for Type {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let descriptor = serde_json::Value::deserialize(deserializer)?;
        build_type(&descriptor).ok_or_else(|| de::Error::custom(no_type_reason(&descriptor)))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let descriptor = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&descriptor)
    }
}

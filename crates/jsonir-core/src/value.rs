//! The intermediate value tree.
//!
//! [`Value`] is a closed set of variants mirroring JSON, but keeping integers
//! and floats apart. Objects and arrays carry a third state next to "empty"
//! and "with contents": *null*. A null container records that the native value
//! was an explicitly absent map or sequence, so that [`decode`](crate::decode)
//! can produce nil for it while an empty container still decodes to `{}`/`[]`.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Tag shared by values and types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Long,
    Double,
    Bool,
    String,
    Object,
    Array,
}

impl Kind {
    /// Upper-case token for the kind. The scalar tokens double as schema
    /// descriptor names (see [`build_type`](crate::build_type)).
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "NULL",
            Kind::Long => "LONG",
            Kind::Double => "DOUBLE",
            Kind::Bool => "BOOL",
            Kind::String => "STRING",
            Kind::Object => "OBJECT",
            Kind::Array => "ARRAY",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the intermediate tree.
///
/// `Null` stands both for an explicit null and for "no value": the encoders
/// return it whenever a subtree cannot be encoded.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
    Object(Object),
    Array(Array),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Integer(_) => Kind::Long,
            Value::Float(_) => Kind::Double,
            Value::Boolean(_) => Kind::Bool,
            Value::Text(_) => Kind::String,
            Value::Object(_) => Kind::Object,
            Value::Array(_) => Kind::Array,
        }
    }

    /// True for `Null` and for null objects/arrays, i.e. everything that
    /// decodes to nil.
    pub fn is_nil(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Object(obj) => obj.is_null(),
            Value::Array(arr) => arr.is_null(),
            _ => false,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Textual form of a scalar: integers in base 10, floats in the shortest
    /// decimal that round-trips (never with an exponent), booleans as
    /// `true`/`false`. Returns `None` for null and containers.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(format_float(*f)),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Shortest round-trip decimal rendering of a float. Rust's `Display` for
/// `f64` already never switches to exponent notation.
pub(crate) fn format_float(f: f64) -> String {
    format!("{}", f)
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl From<Array> for Value {
    fn from(arr: Array) -> Self {
        Value::Array(arr)
    }
}

// ============================================================================
// Object
// ============================================================================

/// Name → value mapping, or the null marker.
///
/// Key iteration order is an implementation detail; callers must not rely on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    fields: Option<BTreeMap<String, Value>>,
}

impl Object {
    /// An empty, non-null object.
    pub fn new() -> Self {
        Self {
            fields: Some(BTreeMap::new()),
        }
    }

    /// The null object.
    pub fn null() -> Self {
        Self { fields: None }
    }

    pub fn is_null(&self) -> bool {
        self.fields.is_none()
    }

    /// Field lookup. A null object has no fields.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.as_ref()?.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.as_mut()?.get_mut(name)
    }

    /// Insert or replace a field, returning the previous value.
    ///
    /// # Panics
    ///
    /// Panics if the object is null; a null object has no backing map.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let name = name.into();
        match self.fields.as_mut() {
            Some(fields) => fields.insert(name, value),
            None => panic!("cannot set field `{name}` on a null object"),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.as_mut()?.remove(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields
            .iter()
            .flat_map(|fields| fields.keys())
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.fields
            .iter()
            .flat_map(|fields| fields.iter())
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields; zero for a null object.
    pub fn len(&self) -> usize {
        self.fields.as_ref().map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BTreeMap<String, Value>> for Object {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self {
            fields: Some(fields),
        }
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: Some(iter.into_iter().collect()),
        }
    }
}

// ============================================================================
// Array
// ============================================================================

/// Ordered sequence of values, or the null marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    items: Option<Vec<Value>>,
}

impl Array {
    pub fn new(items: Vec<Value>) -> Self {
        Self { items: Some(items) }
    }

    /// The null array.
    pub fn null() -> Self {
        Self { items: None }
    }

    pub fn is_null(&self) -> bool {
        self.items.is_none()
    }

    /// Element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`. Check [`len`](Self::len) first.
    pub fn get(&self, index: usize) -> &Value {
        &self.as_slice()[index]
    }

    /// Replace the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`, including every index of a null array.
    pub fn set(&mut self, index: usize, value: Value) {
        match self.items.as_mut() {
            Some(items) => items[index] = value,
            None => panic!("index {index} out of bounds for a null array"),
        }
    }

    /// Number of elements; zero for a null array.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[Value] {
        self.items.as_deref().unwrap_or(&[])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.as_slice().iter()
    }
}

impl Default for Array {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<Value>> for Array {
    fn from(items: Vec<Value>) -> Self {
        Self::new(items)
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ============================================================================
// Serialization
// ============================================================================

/// Serializes the tree directly, with null containers written as `null`.
/// Equivalent to serializing [`decode`](crate::decode)'s output.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Object(obj) => obj.serialize(serializer),
            Value::Array(arr) => arr.serialize(serializer),
        }
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(fields) = &self.fields else {
            return serializer.serialize_none();
        };
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (key, value) in fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Array {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(items) = &self.items else {
            return serializer.serialize_none();
        };
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

//! Reflection over native Rust values.
//!
//! The encoders never look at concrete Rust types. Instead every encodable type
//! implements [`Reflect`], which exposes the value as a [`NativeView`]: a
//! scalar, a record with named fields, a text-keyed mapping, an ordered
//! sequence, or nil. Wrappers (`Option`, `Box`, `Rc`, `Arc`, references) are
//! resolved while producing the view, so the encoders only see what they hold.
//!
//! Record types describe their fields once through a table of
//! [`FieldSpec`]s; the [`record!`](crate::record) macro writes both impls:
//!
//! ```
//! use jsonir_core::{encode, record};
//!
//! struct Account {
//!     id: u32,
//!     owner: String,
//!     note: Option<String>,
//! }
//!
//! record!(Account {
//!     id,
//!     owner => "owner_name",
//!     note => "note,omitempty",
//! });
//!
//! let value = encode(&Account { id: 7, owner: "ada".into(), note: None });
//! let obj = value.as_object().unwrap();
//! assert_eq!(obj.get("owner_name").and_then(|v| v.as_str()), Some("ada"));
//! assert!(obj.get("note").is_none());
//! ```

use crate::field::FieldSpec;
use log::trace;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

/// The shape of a native value as seen by the encoders.
#[derive(Clone, Copy)]
pub enum NativeView<'a> {
    /// No value: `None`, `()`, JSON null.
    Nil,
    Bool(bool),
    /// Any signed integer width.
    Signed(i64),
    /// Any unsigned integer width.
    Unsigned(u64),
    /// Any float width.
    Float(f64),
    Text(&'a str),
    /// Aggregate with named fields.
    Record(&'a dyn Record),
    /// Associative container. Keys that are not text are skipped.
    Map(&'a dyn NativeMap),
    /// Ordered aggregate.
    Seq(&'a dyn NativeSeq),
    /// A mapping type holding no map, e.g. `None::<HashMap<_, _>>`.
    NullMap,
    /// A sequence type holding no sequence, e.g. `None::<Vec<_>>` (but not
    /// `None::<Box<Vec<_>>>`, which is [`Nil`](NativeView::Nil)).
    NullSeq,
    /// A value the encoders cannot represent.
    Unsupported,
}

impl NativeView<'_> {
    /// Short name of the view's kind, used in log messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NativeView::Nil => "nil",
            NativeView::Bool(_) => "bool",
            NativeView::Signed(_) => "signed integer",
            NativeView::Unsigned(_) => "unsigned integer",
            NativeView::Float(_) => "float",
            NativeView::Text(_) => "text",
            NativeView::Record(_) => "record",
            NativeView::Map(_) => "map",
            NativeView::Seq(_) => "sequence",
            NativeView::NullMap => "null map",
            NativeView::NullSeq => "null sequence",
            NativeView::Unsupported => "unsupported",
        }
    }

    /// Whether this is the zero value of its kind: nil, `false`, `0`, `0.0`,
    /// `""`, an empty or null container. Records are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            NativeView::Nil | NativeView::NullMap | NativeView::NullSeq => true,
            NativeView::Bool(b) => !b,
            NativeView::Signed(i) => *i == 0,
            NativeView::Unsigned(u) => *u == 0,
            NativeView::Float(f) => *f == 0.0,
            NativeView::Text(s) => s.is_empty(),
            NativeView::Map(map) => map.len() == 0,
            NativeView::Seq(seq) => seq.len() == 0,
            NativeView::Record(_) | NativeView::Unsupported => false,
        }
    }
}

impl fmt::Debug for NativeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeView::Bool(b) => write!(f, "Bool({b})"),
            NativeView::Signed(i) => write!(f, "Signed({i})"),
            NativeView::Unsigned(u) => write!(f, "Unsigned({u})"),
            NativeView::Float(x) => write!(f, "Float({x})"),
            NativeView::Text(s) => write!(f, "Text({s:?})"),
            NativeView::Map(map) => write!(f, "Map(len={})", map.len()),
            NativeView::Seq(seq) => write!(f, "Seq(len={})", seq.len()),
            NativeView::Record(record) => write!(f, "Record(fields={})", record.fields().len()),
            other => f.write_str(other.kind_name()),
        }
    }
}

/// A native value the encoders can walk.
pub trait Reflect {
    fn view(&self) -> NativeView<'_>;

    /// View reported by `Option::<Self>::None`. Map and sequence types
    /// override this so that a missing container encodes as a null
    /// object/array instead of a plain null. Only a direct
    /// `Option<container>` reports a null container: `Box`, `Rc` and `Arc`
    /// keep the default, so `None::<Box<Vec<_>>>` is plain nil.
    fn null_view() -> NativeView<'static>
    where
        Self: Sized,
    {
        NativeView::Nil
    }

    /// Zero-value test used by `omitempty` fields.
    fn is_zero(&self) -> bool {
        self.view().is_empty()
    }
}

/// A record: an aggregate with a fixed table of named fields.
pub trait Record {
    /// Encodable fields, in declaration order. Fields missing from the table
    /// are never encoded.
    fn fields(&self) -> &[FieldSpec];

    /// The field reached by [`FieldSpec::ident`].
    fn field(&self, ident: &str) -> Option<&dyn Reflect>;
}

/// An associative container.
pub trait NativeMap {
    fn len(&self) -> usize;

    /// All entries, with each key exposed as a view. Iteration order is
    /// whatever the container provides.
    fn entries(&self) -> Box<dyn Iterator<Item = (NativeView<'_>, &dyn Reflect)> + '_>;

    /// Value stored under the text key `key`.
    fn lookup(&self, key: &str) -> Option<&dyn Reflect> {
        self.entries().find_map(|(k, v)| match k {
            NativeView::Text(k) if k == key => Some(v),
            _ => None,
        })
    }
}

/// An ordered aggregate.
pub trait NativeSeq {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&dyn Reflect>;
}

/// Fields of `record` that take part in encoding: every field in the table
/// that the record can produce, minus `omitempty` fields holding their zero
/// value.
pub(crate) fn present_fields<'a>(
    record: &'a dyn Record,
) -> impl Iterator<Item = (&'a FieldSpec, &'a dyn Reflect)> + 'a {
    record.fields().iter().filter_map(move |spec| {
        let Some(value) = record.field(spec.ident()) else {
            trace!("record has no field `{}`, skipping", spec.ident());
            return None;
        };
        if spec.options().omit_empty && value.is_zero() {
            return None;
        }
        Some((spec, value))
    })
}

/// Implement [`Reflect`] and [`Record`] for a struct from a list of its fields.
///
/// Each field is written as `ident` or `ident => "tag"`; see
/// [`FieldSpec`](crate::FieldSpec) for the tag grammar. Fields left out of the
/// list are private to the encoders. The field table is built on first use
/// and shared by every value of the type.
///
/// ```
/// use jsonir_core::record;
///
/// struct Point {
///     x: f64,
///     y: f64,
///     label: String,
///     cache: Vec<u8>,
/// }
///
/// record!(Point { x, y, label => "name,omitempty" });
/// ```
#[macro_export]
macro_rules! record {
    (@tag) => {
        ""
    };
    (@tag $tag:literal) => {
        $tag
    };
    ($ty:ty { $($field:ident $(=> $tag:literal)?),* $(,)? }) => {
        impl $crate::native::Reflect for $ty {
            fn view(&self) -> $crate::native::NativeView<'_> {
                $crate::native::NativeView::Record(self)
            }
        }

        impl $crate::native::Record for $ty {
            fn fields(&self) -> &[$crate::field::FieldSpec] {
                static FIELDS: ::std::sync::OnceLock<::std::vec::Vec<$crate::field::FieldSpec>> =
                    ::std::sync::OnceLock::new();
                FIELDS.get_or_init(|| {
                    $crate::field::FieldSpec::table(&[
                        $((::std::stringify!($field), $crate::record!(@tag $($tag)?)),)*
                    ])
                })
            }

            fn field(&self, ident: &str) -> ::std::option::Option<&dyn $crate::native::Reflect> {
                match ident {
                    $(::std::stringify!($field) => ::std::option::Option::Some(&self.$field),)*
                    _ => ::std::option::Option::None,
                }
            }
        }
    };
}

// ============================================================================
// Scalars
// ============================================================================

macro_rules! reflect_signed {
    ($($t:ty),*) => {
        $(impl Reflect for $t {
            fn view(&self) -> NativeView<'_> {
                NativeView::Signed(*self as i64)
            }
        })*
    };
}

macro_rules! reflect_unsigned {
    ($($t:ty),*) => {
        $(impl Reflect for $t {
            fn view(&self) -> NativeView<'_> {
                NativeView::Unsigned(*self as u64)
            }
        })*
    };
}

reflect_signed!(i8, i16, i32, i64, isize);
reflect_unsigned!(u8, u16, u32, u64, usize);

impl Reflect for f32 {
    fn view(&self) -> NativeView<'_> {
        NativeView::Float(f64::from(*self))
    }
}

impl Reflect for f64 {
    fn view(&self) -> NativeView<'_> {
        NativeView::Float(*self)
    }
}

impl Reflect for bool {
    fn view(&self) -> NativeView<'_> {
        NativeView::Bool(*self)
    }
}

impl Reflect for str {
    fn view(&self) -> NativeView<'_> {
        NativeView::Text(self)
    }
}

impl Reflect for String {
    fn view(&self) -> NativeView<'_> {
        NativeView::Text(self)
    }
}

impl Reflect for () {
    fn view(&self) -> NativeView<'_> {
        NativeView::Nil
    }
}

// ============================================================================
// Wrappers
// ============================================================================

/// `None` is the absent reference; `Some` is never a zero value, whatever
/// it holds.
impl<T: Reflect> Reflect for Option<T> {
    fn view(&self) -> NativeView<'_> {
        match self {
            Some(value) => value.view(),
            None => T::null_view(),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

macro_rules! reflect_transparent {
    ($($wrapper:ident),*) => {
        $(impl<T: Reflect + ?Sized> Reflect for $wrapper<T> {
            fn view(&self) -> NativeView<'_> {
                (**self).view()
            }

            fn is_zero(&self) -> bool {
                (**self).is_zero()
            }
        })*
    };
}

reflect_transparent!(Box, Rc, Arc);

impl<T: Reflect + ?Sized> Reflect for &T {
    fn view(&self) -> NativeView<'_> {
        (**self).view()
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

impl<B> Reflect for Cow<'_, B>
where
    B: Reflect + ToOwned + ?Sized,
{
    fn view(&self) -> NativeView<'_> {
        (**self).view()
    }
}

// ============================================================================
// Sequences
// ============================================================================

impl<T: Reflect> NativeSeq for Vec<T> {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|v| v as &dyn Reflect)
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn view(&self) -> NativeView<'_> {
        NativeView::Seq(self)
    }

    fn null_view() -> NativeView<'static> {
        NativeView::NullSeq
    }
}

impl<T: Reflect> NativeSeq for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        VecDeque::get(self, index).map(|v| v as &dyn Reflect)
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn view(&self) -> NativeView<'_> {
        NativeView::Seq(self)
    }

    fn null_view() -> NativeView<'static> {
        NativeView::NullSeq
    }
}

impl<T: Reflect, const N: usize> NativeSeq for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|v| v as &dyn Reflect)
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn view(&self) -> NativeView<'_> {
        NativeView::Seq(self)
    }

    fn null_view() -> NativeView<'static> {
        NativeView::NullSeq
    }
}

// ============================================================================
// Maps
// ============================================================================

impl<K: Reflect, V: Reflect, S: BuildHasher> NativeMap for HashMap<K, V, S> {
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (NativeView<'_>, &dyn Reflect)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.view(), v as &dyn Reflect)))
    }
}

impl<K: Reflect, V: Reflect, S: BuildHasher> Reflect for HashMap<K, V, S> {
    fn view(&self) -> NativeView<'_> {
        NativeView::Map(self)
    }

    fn null_view() -> NativeView<'static> {
        NativeView::NullMap
    }
}

impl<K: Reflect, V: Reflect> NativeMap for BTreeMap<K, V> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (NativeView<'_>, &dyn Reflect)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.view(), v as &dyn Reflect)))
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn view(&self) -> NativeView<'_> {
        NativeView::Map(self)
    }

    fn null_view() -> NativeView<'static> {
        NativeView::NullMap
    }
}

// ============================================================================
// JSON documents
// ============================================================================

/// Parsed JSON is a native value like any other, which makes
/// `serde_json::Value` usable both as encoder input and as a schema
/// descriptor.
impl Reflect for serde_json::Value {
    fn view(&self) -> NativeView<'_> {
        use serde_json::Value as Json;
        match self {
            Json::Null => NativeView::Nil,
            Json::Bool(b) => NativeView::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    NativeView::Signed(i)
                } else if let Some(u) = n.as_u64() {
                    NativeView::Unsigned(u)
                } else {
                    n.as_f64().map_or(NativeView::Unsupported, NativeView::Float)
                }
            }
            Json::String(s) => NativeView::Text(s),
            Json::Array(items) => NativeView::Seq(items),
            Json::Object(map) => NativeView::Map(map),
        }
    }
}

impl NativeMap for serde_json::Map<String, serde_json::Value> {
    fn len(&self) -> usize {
        serde_json::Map::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (NativeView<'_>, &dyn Reflect)> + '_> {
        Box::new(
            self.iter()
                .map(|(k, v)| (NativeView::Text(k), v as &dyn Reflect)),
        )
    }

    fn lookup(&self, key: &str) -> Option<&dyn Reflect> {
        serde_json::Map::get(self, key).map(|v| v as &dyn Reflect)
    }
}

impl Reflect for serde_json::Map<String, serde_json::Value> {
    fn view(&self) -> NativeView<'_> {
        NativeView::Map(self)
    }

    fn null_view() -> NativeView<'static> {
        NativeView::NullMap
    }
}

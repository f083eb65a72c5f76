//! # jsonir-core
//!
//! A dynamically typed intermediate representation for structured data, with
//! conversions in both directions:
//!
//! - native Rust value → [`Value`], either structurally ([`encode`]) or
//!   constrained by a [`Type`] schema ([`encode_by_type`]), which coerces
//!   scalars, drops unknown fields and fills missing ones with null;
//! - [`Value`] → dynamic `serde_json::Value` ([`decode`]), ready for any
//!   serde serializer.
//!
//! The crate never reads or writes JSON bytes itself apart from the
//! convenience helpers that wrap `serde_json`.
//!
//! ## Quick start
//!
//! ```rust
//! use jsonir_core::{build_type, decode, encode, encode_by_type, record};
//! use serde_json::json;
//!
//! struct Reading {
//!     sensor: String,
//!     value: String,
//!     unit: String,
//! }
//!
//! record!(Reading { sensor, value, unit => "unit,omitempty" });
//!
//! let reading = Reading { sensor: "t1".into(), value: "21.5".into(), unit: String::new() };
//!
//! // Structural: the native shape, as-is.
//! assert_eq!(decode(&encode(&reading)), json!({"sensor": "t1", "value": "21.5"}));
//!
//! // Schema-directed: the agreed shape, with coercion.
//! let schema = build_type(&json!({"sensor": "STRING", "value": "DOUBLE", "unit": "STRING"})).unwrap();
//! assert_eq!(
//!     decode(&encode_by_type(&reading, &schema)),
//!     json!({"sensor": "t1", "value": 21.5, "unit": null}),
//! );
//! ```
//!
//! ## Modules
//!
//! - [`value`]: the intermediate tree (`Value`, `Object`, `Array`, `Kind`)
//! - [`schema`]: type schemas and `build_type`
//! - [`native`]: the `Reflect` trait native values implement, and `record!`
//! - [`field`]: per-field tags for record types
//! - [`encoder`]: structural encoder
//! - [`typed_encoder`]: schema-directed encoder
//! - [`decoder`]: `Value` → `serde_json::Value`
//! - [`error`]: errors of the text-facing helpers
//!
//! ## Limitations
//!
//! Conversions recurse once per nesting level and do not detect cycles.
//! Owned Rust values cannot form cycles, but a `Reflect` impl that reaches
//! back into its own ancestors (e.g. through `Rc` and interior mutability)
//! will exhaust the stack.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod field;
pub mod native;
pub mod schema;
pub mod typed_encoder;
pub mod value;

pub use decoder::{decode, to_json_string, to_json_string_pretty};
pub use encoder::encode;
pub use error::{JsonIrError, Result};
pub use field::{FieldOptions, FieldSpec};
pub use native::{NativeMap, NativeSeq, NativeView, Record, Reflect};
pub use schema::{build_type, parse_type, ArrayType, ObjectType, Type};
pub use typed_encoder::encode_by_type;
pub use value::{Array, Kind, Object, Value};

//! Per-field encoding descriptors for record types.
//!
//! A record type publishes one [`FieldSpec`] per encodable field. Specs are
//! usually parsed from tag strings of the form `name[,option]*`:
//!
//! - `""` keeps the field's own name;
//! - `"id"` renames the field to `id`;
//! - `"id,omitempty"` also skips the field while it holds its zero value;
//! - `",string"` keeps the name and emits scalar values as text;
//! - `"-"` removes the field from encoding altogether.
//!
//! A name may contain letters, digits and `$ - _ / %`. Any other name is
//! ignored and the field keeps its own name.
//!
//! ```
//! use jsonir_core::FieldSpec;
//!
//! let spec = FieldSpec::parse("user_id", "id,omitempty").unwrap();
//! assert_eq!(spec.name(), "id");
//! assert!(spec.options().omit_empty);
//! assert!(FieldSpec::parse("secret", "-").is_none());
//! ```

use log::debug;
use unicode_general_category::{get_general_category, GeneralCategory};

/// Options carried by a field tag after the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldOptions {
    /// Skip the field when it holds the zero value of its kind.
    pub omit_empty: bool,
    /// Emit boolean and numeric values as text.
    pub quoted: bool,
}

/// How one field of a record is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    ident: &'static str,
    name: String,
    options: FieldOptions,
}

impl FieldSpec {
    /// A field encoded under its own identifier, without options.
    pub fn new(ident: &'static str) -> Self {
        Self {
            ident,
            name: ident.to_string(),
            options: FieldOptions::default(),
        }
    }

    /// Parse a tag for the field `ident`. Returns `None` for the tag `-`,
    /// which removes the field.
    pub fn parse(ident: &'static str, tag: &str) -> Option<Self> {
        if tag == "-" {
            return None;
        }
        let mut spec = Self::new(ident);
        if tag.is_empty() {
            return Some(spec);
        }

        let (name, options) = match tag.split_once(',') {
            Some((name, options)) => (name, options),
            None => (tag, ""),
        };
        if is_valid_name(name) {
            spec.name = name.to_string();
        } else if !name.is_empty() {
            debug!("ignoring invalid name {name:?} in tag of field `{ident}`");
        }
        spec.options.omit_empty = has_option(options, "omitempty");
        spec.options.quoted = has_option(options, "string");
        Some(spec)
    }

    /// Build a field table from `(identifier, tag)` pairs, dropping fields
    /// tagged `-`. Record types call this once and keep the result.
    pub fn table(entries: &[(&'static str, &str)]) -> Vec<FieldSpec> {
        entries
            .iter()
            .filter_map(|(ident, tag)| Self::parse(ident, tag))
            .collect()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn omit_empty(mut self) -> Self {
        self.options.omit_empty = true;
        self
    }

    pub fn quoted(mut self) -> Self {
        self.options.quoted = true;
        self
    }

    /// The Rust identifier used to reach the field through
    /// [`Record::field`](crate::Record::field).
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    /// The name the field is encoded under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> FieldOptions {
        self.options
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| matches!(c, '$' | '-' | '_' | '/' | '%') || is_letter_or_digit(c))
}

/// Letters are the `L*` categories and digits are `Nd` only: superscripts,
/// fractions, letter numbers and combining marks are rejected.
fn is_letter_or_digit(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
    )
}

fn has_option(options: &str, wanted: &str) -> bool {
    !options.is_empty() && options.split(',').any(|opt| opt == wanted)
}

//! Error types for the text-facing helpers.
//!
//! The conversions themselves never fail: mismatches degrade to
//! [`Value::Null`](crate::Value::Null). Only parsing schema descriptors from
//! text and rendering values to JSON text can report errors.

use thiserror::Error;

/// Errors raised while reading or writing JSON text around the core conversions.
#[derive(Error, Debug)]
pub enum JsonIrError {
    /// The input string was not valid JSON, or the output could not be rendered.
    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The descriptor parsed as JSON but does not describe any type.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}

/// Convenience alias used throughout jsonir-core.
pub type Result<T> = std::result::Result<T, JsonIrError>;

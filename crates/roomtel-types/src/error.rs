//! Error types for payload grammar selection.
//!
//! Field-level decode failures are never errors: a field that fails to parse
//! becomes the explicit missing marker (`f64::NAN`) so that partial payloads
//! still render. Errors here only cover configuration-time lookups, such as
//! resolving a schema or field by name.

use thiserror::Error;

/// Errors that can occur when resolving roomtel grammar elements by name.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// No field schema is registered under the given name.
    #[error("unknown field schema: {0}")]
    UnknownSchema(String),

    /// No payload field is known under the given key.
    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Result type alias using roomtel-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

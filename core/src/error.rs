//! Error types for parsing and schema loading.
//!
//! [`ParseError`] covers everything that can abort a
//! [`Binder::parse`](crate::Binder::parse) call. [`SchemaError`] covers
//! reading a schema document from disk or a string.

use thiserror::Error;

use crate::validate::ValidationError;

/// Errors that abort a parse. No partial result is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A positional token or bound flag value failed its declared type.
    #[error("`{option}`: {value} must be a {expected}")]
    TypeMismatch {
        option: String,
        value: String,
        expected: String,
    },

    /// A required option has no supplied value and no usable default.
    #[error("`{0}` is required")]
    MissingRequired(String),

    /// The schema declares a type the validator does not recognize.
    #[error("type \"{kind}\" and value {value} not supported")]
    UnsupportedType { kind: String, value: String },
}

/// Errors that can occur while loading a schema document.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The document parsed but declares an invalid schema.
    #[error("invalid schema: {0}")]
    Invalid(#[from] ValidationError),
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;

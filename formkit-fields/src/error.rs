//! Error types for field declarations

use thiserror::Error;

/// Result type for field declaration operations
pub type Result<T> = std::result::Result<T, FieldError>;

/// Errors that can occur when declaring a field
///
/// These are programmer errors surfaced at declaration time. Runtime
/// problems with field values (missing, un-coercible, rejected by a
/// validator) are never errors — they are recorded in validation reports.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Field name is empty or whitespace only
    #[error("field name cannot be empty")]
    EmptyName,

    /// Choice field declared without any options
    #[error("choice field '{name}' has no options")]
    NoChoices { name: String },

    /// Declared default value does not fit the field kind
    #[error("default value for field '{name}' does not match kind '{kind}'")]
    DefaultKindMismatch { name: String, kind: String },

    /// Pattern validator given an invalid regular expression
    #[error("invalid validation pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

//! Error types for schema declaration

use formkit_fields::FieldError;
use thiserror::Error;

/// Result type for schema declaration operations
pub type SchemaResult<T> = std::result::Result<T, SchemaError>;

/// Errors that can occur when building a schema.
///
/// All of these are programmer errors and surface from
/// `SchemaBuilder::build`, never at instance-use time. Runtime problems
/// with field values are recorded in validation reports instead.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema name is empty or whitespace only
    #[error("schema name cannot be empty")]
    EmptyName,

    /// The same field name declared twice on one schema
    #[error("schema '{schema}' declares duplicate field '{name}'")]
    DuplicateField { schema: String, name: String },

    /// A field declaration is invalid (empty name, optionless choice, ...)
    #[error("schema '{schema}': {source}")]
    InvalidField {
        schema: String,
        #[source]
        source: FieldError,
    },
}

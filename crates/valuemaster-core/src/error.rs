use thiserror::Error;

/// Validation errors raised while constructing domain values and configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },

    #[error("observation date must be YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("invalid acquisition mode '{value}', expected one of live, offline")]
    InvalidMode { value: String },
}

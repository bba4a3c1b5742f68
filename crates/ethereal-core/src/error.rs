//! Error types for ethereal-core.

use thiserror::Error;

/// Malformed flattened type-schema string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("invalid field {field:?} in type string (expected \"<type> <name>\")")]
    InvalidField { field: String },
}

/// Decimal string could not be converted to the exchange's fixed-point encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScaleError {
    #[error("bad decimal {0:?}")]
    InvalidDecimal(String),

    #[error("decimal {0} does not fit the 1e9 fixed-point range")]
    Overflow(String),
}

pub type SchemaResult<T> = Result<T, SchemaError>;
pub type ScaleResult<T> = Result<T, ScaleError>;

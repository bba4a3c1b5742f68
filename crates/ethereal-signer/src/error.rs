//! Error types for typed-data hashing, key loading and signing.

use alloy::primitives::Address;
use ethereal_core::{ScaleError, SchemaError};
use thiserror::Error;

/// Struct hashing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("unknown primary type: {0}")]
    UnknownPrimaryType(String),

    #[error("invalid type {ty:?}: {reason}")]
    InvalidType { ty: String, reason: String },

    #[error("missing value for field {field}")]
    MissingField { field: String },

    #[error("field {field} is not declared by type {primary_type}")]
    UnexpectedField { field: String, primary_type: String },

    #[error("field {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("cannot encode {primary_type}: {reason}")]
    Encoding { primary_type: String, reason: String },
}

/// Signing errors.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("typed-data domain has not been initialized")]
    DomainNotInitialized,

    #[error("typed-data domain is already initialized")]
    DomainAlreadyInitialized,

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Scale error: {0}")]
    Scale(#[from] ScaleError),

    #[error("Hash error: {0}")]
    Hash(#[from] HashError),

    #[error("invalid sender address {0:?}")]
    InvalidSender(String),

    #[error("Signing failed: {0}")]
    SigningFailed(#[from] alloy::signers::Error),
}

/// Key management errors.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Failed to decode hex: {0}")]
    HexDecode(#[from] hex::FromHexError),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Address mismatch: expected {expected}, got {actual}")]
    AddressMismatch { expected: Address, actual: Address },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type HashResult<T> = Result<T, HashError>;
pub type SignerResult<T> = Result<T, SignerError>;
pub type KeyResult<T> = Result<T, KeyError>;

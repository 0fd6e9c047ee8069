//! Error type for parsing and constructing the fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("XFL value is not a finite number")]
    XflNotFinite,

    #[error("XFL exponent overflow")]
    XflOverflow,

    #[error("malformed XFL encoding: {0:#018x}")]
    XflMalformed(u64),

    #[error("XFL value is negative")]
    XflNegative,
}

impl From<hex::FromHexError> for TypesError {
    fn from(e: hex::FromHexError) -> Self {
        TypesError::InvalidHex(e.to_string())
    }
}

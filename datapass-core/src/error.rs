//! Core error types for `DataPass`.

use thiserror::Error;

/// Core error type for `DataPass` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Unknown unit token.
    #[error("Invalid unit: {0}")]
    InvalidUnit(String),

    /// Number that cannot be read as a decimal.
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// Unknown update mode name.
    #[error("Invalid update mode: {0}")]
    InvalidMode(String),

    /// Unknown carrier family name.
    #[error("Unknown carrier: {0}")]
    UnknownCarrier(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

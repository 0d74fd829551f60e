//! Error types for the contact index.
//!
//! This module defines custom error types using `thiserror` for precise error handling.
//! Index-level outcomes (duplicate key, missing key) are plain return values;
//! these types cover the layers around the index.

use crate::domain::InvalidField;
use crate::models::RecordKey;
use thiserror::Error;

/// Errors surfaced by the contact service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// A record with the same exact key already exists
    #[error("Contact already exists: {0}")]
    DuplicateKey(RecordKey),

    /// No record with this exact key
    #[error("Contact not found: {0}")]
    NotFound(RecordKey),

    /// One or more fields failed validation
    #[error("Invalid contact fields: {}", format_fields(.0))]
    Invalid(Vec<InvalidField>),
}

fn format_fields(fields: &[InvalidField]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Errors raised by the stdio command server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// A request line was not valid JSON or did not match any command
    #[error("Malformed request: {0}")]
    MalformedRequest(#[from] serde_json::Error),

    /// A request line was not valid UTF-8
    #[error("Malformed request: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    /// The command reached the service and was refused
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Reading stdin or writing stdout failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A structural problem found by [`crate::ContactIndex::check_invariants`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// |height(left) - height(right)| exceeds 1
    #[error("Node {key} is unbalanced (balance factor {balance})")]
    Unbalanced { key: RecordKey, balance: i64 },

    /// Cached height differs from the recomputed one
    #[error("Node {key} caches height {cached} but has height {actual}")]
    StaleHeight {
        key: RecordKey,
        cached: u32,
        actual: u32,
    },

    /// In-order traversal is not strictly increasing
    #[error("Record {key} is out of order")]
    OutOfOrder { key: RecordKey },

    /// Recorded length does not match the number of nodes
    #[error("Index records {recorded} entries but holds {counted}")]
    LengthMismatch { counted: usize, recorded: usize },
}

/// Convenience type alias for Results with ServiceError
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with ServerError
pub type ServerResult<T> = Result<T, ServerError>;

/// Convenience type alias for Results with InvariantViolation
pub type InvariantResult<T> = Result<T, InvariantViolation>;

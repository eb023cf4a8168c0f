//! Search error types.
//!
//! This module defines the error taxonomy for query construction and index
//! transport operations.

use thiserror::Error;

/// Errors that can occur during query construction and index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// Invalid search parameters, caught before any network call.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The requested resource does not exist in the index.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The index did not answer within the deadline.
    #[error("Timeout during {operation}")]
    Timeout {
        /// Name of the operation that timed out.
        operation: String,
    },

    /// The index could not be reached at all.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any other index failure, wrapped with the operation name for diagnostics.
    #[error("Repository error during {operation}: {message}")]
    Repository {
        /// Name of the failed operation.
        operation: String,
        /// Message carried from the original cause.
        message: String,
    },

    /// The index response could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl SearchError {
    /// Create an invalid parameters error.
    pub fn invalid_parameters(msg: impl Into<String>) -> Self {
        Self::InvalidParameters(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a timeout error for the given operation.
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a repository error carrying the operation name.
    pub fn repository(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Repository {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

//! Error types for the catalog search ingest.

use catalog_search_repository::SearchError;
use thiserror::Error;

/// Errors that can abort a bulk ingestion call.
///
/// Per-item write failures never surface here; they are recorded in the
/// `OperationReport`. Only pre-flight configuration errors and total
/// transport unavailability abort the call.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Invalid batch size, parallelism, retry policy or failure threshold.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Hard error from the search index (e.g., index unreachable).
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),
}

impl IngestError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

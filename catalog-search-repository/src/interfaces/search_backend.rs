//! Search index backend trait definition.
//!
//! This module defines the abstract interface over the index transport,
//! allowing different backend implementations (OpenSearch, in-memory, etc.).

use async_trait::async_trait;

use crate::errors::SearchError;
use crate::query::QueryDocument;
use catalog_search_shared::{FailureCause, ProductRecord, SearchPage};

/// Wire-level status of one item in a bulk upsert response.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemStatus {
    /// The record id the status refers to.
    pub id: String,
    /// `None` on success, otherwise the classified failure cause.
    pub failure: Option<FailureCause>,
}

impl BulkItemStatus {
    /// Create a success status.
    pub fn ok(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            failure: None,
        }
    }

    /// Create a failed status with its classified cause.
    pub fn failed(id: impl Into<String>, cause: FailureCause) -> Self {
        Self {
            id: id.into(),
            failure: Some(cause),
        }
    }

    /// Whether the item was written successfully.
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Abstracts the underlying search index transport.
///
/// The transport is shared read-write across concurrent batch workers and
/// must support concurrent use without external locking. Implementations are
/// injected into the query executor and the ingestion pipeline, enabling
/// testing with in-memory or scripted backends.
///
/// # Error Handling
///
/// All methods return `Result<T, SearchError>`. `SearchError::Connection`
/// means the index could not be reached at all; callers treat it as a hard
/// failure since no per-item status is obtainable.
#[async_trait]
pub trait SearchIndexBackend: Send + Sync {
    /// Execute a query document against the index.
    ///
    /// # Returns
    ///
    /// * `Ok(SearchPage)` - Matched records in index-returned order plus the
    ///   total hit count
    /// * `Err(SearchError::NotFound)` - The index or resource does not exist
    /// * `Err(SearchError::Timeout)` - The index did not answer in time
    /// * `Err(SearchError)` - Any other classified failure
    async fn search(&self, doc: &QueryDocument) -> Result<SearchPage, SearchError>;

    /// Write a batch of records in one bulk call with upsert semantics.
    ///
    /// One round trip per batch, keyed by record id: re-submitting an
    /// identical batch never creates duplicates. The returned statuses are
    /// aligned with the request order, one per submitted record.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<BulkItemStatus>)` - Per-item outcomes as reported by the index
    /// * `Err(SearchError::Connection)` - The index was unreachable
    /// * `Err(SearchError)` - The request failed as a whole before any
    ///   per-item status was produced
    async fn bulk_upsert(&self, records: &[ProductRecord]) -> Result<Vec<BulkItemStatus>, SearchError>;

    /// Ensure the catalog index exists with proper mappings.
    ///
    /// Called during application startup.
    async fn ensure_index_exists(&self) -> Result<(), SearchError>;

    /// Check if the index is healthy and reachable.
    async fn health_check(&self) -> Result<bool, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_status() {
        let ok = BulkItemStatus::ok("sku-1");
        assert!(ok.is_success());

        let failed = BulkItemStatus::failed("sku-2", FailureCause::Conflict);
        assert!(!failed.is_success());
        assert_eq!(failed.failure, Some(FailureCause::Conflict));
    }
}

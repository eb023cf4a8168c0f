//! Bulk writer.
//!
//! Submits one batch as a single bulk upsert and interprets the per-item
//! response. A request-level failure marks every item in the batch as failed
//! with a transport cause; only connection-level unavailability propagates
//! as a hard error, since no per-item status is obtainable.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use catalog_search_repository::{SearchError, SearchIndexBackend};
use catalog_search_shared::{FailureCause, ProductRecord};

/// A record awaiting submission, with its retry bookkeeping.
#[derive(Debug, Clone)]
pub struct PendingItem {
    /// Offset of the record in the original input sequence.
    pub offset: usize,
    /// The record itself.
    pub record: ProductRecord,
    /// Number of attempts issued so far.
    pub attempts: u32,
    /// Cause of the most recent failure, if any.
    pub last_cause: Option<FailureCause>,
}

impl PendingItem {
    /// Create a fresh pending item with no attempts.
    pub fn new(offset: usize, record: ProductRecord) -> Self {
        Self {
            offset,
            record,
            attempts: 0,
            last_cause: None,
        }
    }
}

/// Result of one write attempt for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptOutcome {
    /// Offset of the record in the original input sequence.
    pub offset: usize,
    /// The record's identifier.
    pub id: String,
    /// `None` on success, otherwise the classified failure cause.
    pub failure: Option<FailureCause>,
}

/// Submits one batch as a single bulk write.
pub struct BulkWriter {
    backend: Arc<dyn SearchIndexBackend>,
}

impl BulkWriter {
    /// Create a writer over the given backend.
    pub fn new(backend: Arc<dyn SearchIndexBackend>) -> Self {
        Self { backend }
    }

    /// Submit the given items as one bulk upsert.
    ///
    /// Returns one outcome per submitted item, in item order. The index's
    /// per-item status is the source of truth; statuses are aligned by id
    /// with positional fallback.
    ///
    /// # Errors
    ///
    /// `SearchError::Connection` when the index is unreachable. Any other
    /// request-level failure is folded into per-item transport failures
    /// instead of erroring.
    pub async fn submit(&self, items: &[PendingItem]) -> Result<Vec<AttemptOutcome>, SearchError> {
        let records: Vec<ProductRecord> = items.iter().map(|item| item.record.clone()).collect();

        let statuses = match self.backend.bulk_upsert(&records).await {
            Ok(statuses) => statuses,
            Err(SearchError::Connection(msg)) => {
                // Unreachable index yields no per-item status at all.
                return Err(SearchError::Connection(msg));
            }
            Err(e) => {
                warn!(error = %e, count = items.len(), "Bulk request failed, marking whole batch as transport failure");
                return Ok(items
                    .iter()
                    .map(|item| AttemptOutcome {
                        offset: item.offset,
                        id: item.record.id.clone(),
                        failure: Some(FailureCause::Transport),
                    })
                    .collect());
            }
        };

        let by_id: HashMap<&str, Option<FailureCause>> = statuses
            .iter()
            .map(|status| (status.id.as_str(), status.failure))
            .collect();

        let outcomes: Vec<AttemptOutcome> = items
            .iter()
            .enumerate()
            .map(|(pos, item)| {
                let failure = match by_id.get(item.record.id.as_str()) {
                    Some(failure) => *failure,
                    // Id not present in the response: fall back to position,
                    // then to a transport cause rather than dropping the item.
                    None => statuses
                        .get(pos)
                        .map(|status| status.failure)
                        .unwrap_or(Some(FailureCause::Transport)),
                };
                AttemptOutcome {
                    offset: item.offset,
                    id: item.record.id.clone(),
                    failure,
                }
            })
            .collect();

        debug!(
            submitted = items.len(),
            failed = outcomes.iter().filter(|o| o.failure.is_some()).count(),
            "Bulk attempt completed"
        );

        Ok(outcomes)
    }
}

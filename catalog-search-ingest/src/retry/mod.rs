//! Retry coordination.
//!
//! Drives one batch through `Pending -> Submitted -> {AllSucceeded,
//! PartiallyFailed, FatallyFailed}`: the initial bulk submission, bounded
//! re-submission of only the failed subset with backoff, and terminal
//! classification of every item.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cancel::CancelSignal;
use crate::errors::IngestError;
use crate::planner::Batch;
use crate::sinks::IngestEventSink;
use crate::writer::{BulkWriter, PendingItem};
use catalog_search_shared::{FailureCause, ItemOutcome};

/// Bounds and backoff shape for re-submissions.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of write attempts per item, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on the backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Validate the policy before processing starts.
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.max_attempts == 0 {
            return Err(IngestError::config("max attempts must be >= 1"));
        }
        Ok(())
    }
}

/// Terminal classification of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchDisposition {
    /// Every item succeeded.
    AllSucceeded,
    /// Some items succeeded, some failed permanently.
    PartiallyFailed,
    /// Every item failed permanently.
    FatallyFailed,
}

/// A permanently failed item, tagged with its input offset for report ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedItem {
    /// Offset of the record in the original input sequence.
    pub offset: usize,
    /// The terminal outcome.
    pub outcome: ItemOutcome,
}

/// Terminal outcome of one batch after all retries.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Zero-based batch index.
    pub batch_index: usize,
    /// Number of records submitted with this batch.
    pub submitted: usize,
    /// Number of records that succeeded.
    pub succeeded: usize,
    /// Permanently failed items, ordered by input offset.
    pub failed: Vec<FailedItem>,
    /// Whether the batch was cut short by cancellation.
    pub cancelled: bool,
}

impl BatchOutcome {
    /// Terminal classification of this batch.
    pub fn disposition(&self) -> BatchDisposition {
        if self.failed.is_empty() {
            BatchDisposition::AllSucceeded
        } else if self.succeeded == 0 {
            BatchDisposition::FatallyFailed
        } else {
            BatchDisposition::PartiallyFailed
        }
    }

    /// Outcome for a batch that was never submitted because the operation
    /// was cancelled first. Every item is failed with a cancelled cause.
    pub fn cancelled_before_submit(batch: Batch) -> Self {
        let batch_index = batch.index;
        let offset = batch.offset;
        let submitted = batch.len();
        let failed = batch
            .records
            .into_iter()
            .enumerate()
            .map(|(i, record)| FailedItem {
                offset: offset + i,
                outcome: ItemOutcome::failed(record.id, FailureCause::Cancelled, 0),
            })
            .collect();

        Self {
            batch_index,
            submitted,
            succeeded: 0,
            failed,
            cancelled: true,
        }
    }
}

/// Coordinates submission and bounded retries for one batch at a time.
///
/// Each batch owns its own retry bookkeeping; coordinators share nothing but
/// the writer's backend, so batches can run concurrently.
pub struct RetryCoordinator {
    writer: BulkWriter,
    policy: RetryPolicy,
    events: Arc<dyn IngestEventSink>,
}

impl RetryCoordinator {
    /// Create a coordinator with the given writer, policy and event sink.
    pub fn new(writer: BulkWriter, policy: RetryPolicy, events: Arc<dyn IngestEventSink>) -> Self {
        Self {
            writer,
            policy,
            events,
        }
    }

    /// Drive one batch to a terminal state.
    ///
    /// Re-submits only the currently failed subset, never previously
    /// succeeded items. An item is frozen as permanently failed once its
    /// attempt count reaches the policy maximum while still failing. When
    /// the cancel signal is raised no further retries are issued; remaining
    /// items are frozen with a cancelled cause.
    ///
    /// # Errors
    ///
    /// Only `SearchError::Connection` (index unreachable) escalates here;
    /// everything else is recorded per item.
    pub async fn run_batch(
        &self,
        batch: Batch,
        cancel: CancelSignal,
    ) -> Result<BatchOutcome, IngestError> {
        let batch_index = batch.index;
        let batch_offset = batch.offset;
        let submitted = batch.len();

        self.events.batch_started(batch_index, submitted);

        let mut pending: Vec<PendingItem> = batch
            .records
            .into_iter()
            .enumerate()
            .map(|(i, record)| PendingItem::new(batch_offset + i, record))
            .collect();

        let mut succeeded = 0usize;
        let mut failed: Vec<FailedItem> = Vec::new();
        let mut cancelled = false;
        let mut delay = self.policy.initial_delay;
        let mut attempt = 1u32;

        while !pending.is_empty() {
            if attempt > 1 {
                if cancel.is_cancelled() {
                    cancelled = true;
                    break;
                }

                debug!(
                    batch = batch_index,
                    attempt,
                    retrying = pending.len(),
                    delay_ms = delay.as_millis() as u64,
                    "Retrying failed subset"
                );
                for item in &pending {
                    self.events.retry_scheduled(batch_index, &item.record.id, attempt);
                }

                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(self.policy.max_delay);
            }

            let outcomes = self.writer.submit(&pending).await?;

            let mut still_failed = Vec::new();
            for (mut item, outcome) in pending.into_iter().zip(outcomes) {
                item.attempts += 1;
                match outcome.failure {
                    None => succeeded += 1,
                    Some(cause) => {
                        item.last_cause = Some(cause);
                        if item.attempts >= self.policy.max_attempts {
                            failed.push(FailedItem {
                                offset: item.offset,
                                outcome: ItemOutcome::failed(item.record.id, cause, item.attempts),
                            });
                        } else {
                            still_failed.push(item);
                        }
                    }
                }
            }
            pending = still_failed;
            attempt += 1;
        }

        // Items still pending after cancellation are frozen, not retried.
        for item in pending {
            failed.push(FailedItem {
                offset: item.offset,
                outcome: ItemOutcome::failed(item.record.id, FailureCause::Cancelled, item.attempts),
            });
        }

        failed.sort_by_key(|item| item.offset);

        if !failed.is_empty() {
            warn!(
                batch = batch_index,
                succeeded,
                failed = failed.len(),
                cancelled,
                "Batch completed with failures"
            );
        }
        self.events.batch_completed(batch_index, succeeded, failed.len());

        Ok(BatchOutcome {
            batch_index,
            submitted,
            succeeded,
            failed,
            cancelled,
        })
    }
}

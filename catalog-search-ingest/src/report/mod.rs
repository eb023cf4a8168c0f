//! Failure aggregation.
//!
//! Folds per-batch outcomes into one operation-level report and decides
//! overall success, partial success, or failure by a configurable
//! failure-ratio threshold.

use tracing::debug;

use crate::retry::BatchOutcome;
use catalog_search_shared::{OperationReport, OperationStatus};

/// Aggregates batch outcomes into an `OperationReport`.
#[derive(Debug, Clone)]
pub struct FailureAggregator {
    /// Failure ratio (failed / total) at which the operation as a whole is
    /// classified `Failed`. With the default of 1.0 only a total failure is
    /// `Failed`; anything in between is `PartialSuccess`.
    failure_threshold: f64,
}

impl Default for FailureAggregator {
    fn default() -> Self {
        Self {
            failure_threshold: 1.0,
        }
    }
}

impl FailureAggregator {
    /// Create an aggregator with the given failure-ratio threshold.
    pub fn new(failure_threshold: f64) -> Self {
        Self { failure_threshold }
    }

    /// Fold all batch outcomes into one report.
    ///
    /// Successes are summed; permanently failed items are collected in
    /// original input order regardless of batch completion order.
    pub fn aggregate(&self, total: usize, outcomes: Vec<BatchOutcome>) -> OperationReport {
        let mut succeeded = 0usize;
        let mut cancelled = false;
        let mut failed_items: Vec<_> = Vec::new();

        for outcome in outcomes {
            succeeded += outcome.succeeded;
            cancelled |= outcome.cancelled;
            failed_items.extend(outcome.failed);
        }

        failed_items.sort_by_key(|item| item.offset);
        let failed: Vec<_> = failed_items.into_iter().map(|item| item.outcome).collect();

        let status = if failed.is_empty() {
            OperationStatus::Success
        } else if total > 0 && (failed.len() as f64 / total as f64) >= self.failure_threshold {
            OperationStatus::Failed
        } else {
            OperationStatus::PartialSuccess
        };

        debug!(
            total,
            succeeded,
            failed = failed.len(),
            ?status,
            cancelled,
            "Aggregated operation report"
        );

        OperationReport {
            total,
            succeeded,
            failed,
            status,
            cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::FailedItem;
    use catalog_search_shared::{FailureCause, ItemOutcome};

    fn outcome(batch_index: usize, succeeded: usize, failed: Vec<FailedItem>) -> BatchOutcome {
        BatchOutcome {
            batch_index,
            submitted: succeeded + failed.len(),
            succeeded,
            failed,
            cancelled: false,
        }
    }

    fn failed_item(offset: usize, id: &str) -> FailedItem {
        FailedItem {
            offset,
            outcome: ItemOutcome::failed(id, FailureCause::Transport, 3),
        }
    }

    #[test]
    fn test_all_succeeded() {
        let report = FailureAggregator::default()
            .aggregate(5, vec![outcome(0, 3, vec![]), outcome(1, 2, vec![])]);

        assert_eq!(report.status, OperationStatus::Success);
        assert_eq!(report.succeeded, 5);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_partial_success_below_threshold() {
        let report = FailureAggregator::default().aggregate(
            4,
            vec![outcome(0, 3, vec![failed_item(2, "sku-2")])],
        );

        assert_eq!(report.status, OperationStatus::PartialSuccess);
        assert_eq!(report.succeeded, 3);
        assert_eq!(report.failed.len(), 1);
    }

    #[test]
    fn test_total_failure_is_failed() {
        let report = FailureAggregator::default().aggregate(
            2,
            vec![outcome(0, 0, vec![failed_item(0, "a"), failed_item(1, "b")])],
        );

        assert_eq!(report.status, OperationStatus::Failed);
    }

    #[test]
    fn test_custom_threshold() {
        // Half the items failing reaches a 0.5 threshold.
        let report = FailureAggregator::new(0.5).aggregate(
            4,
            vec![outcome(0, 2, vec![failed_item(1, "b"), failed_item(3, "d")])],
        );

        assert_eq!(report.status, OperationStatus::Failed);
    }

    #[test]
    fn test_failures_ordered_by_input_offset() {
        // Batches complete out of order; the report must not.
        let report = FailureAggregator::default().aggregate(
            6,
            vec![
                outcome(1, 1, vec![failed_item(4, "sku-4")]),
                outcome(0, 1, vec![failed_item(1, "sku-1"), failed_item(2, "sku-2")]),
            ],
        );

        let ids: Vec<&str> = report.failed.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["sku-1", "sku-2", "sku-4"]);
    }

    #[test]
    fn test_cancelled_propagates() {
        let mut cancelled_outcome = outcome(0, 1, vec![failed_item(1, "b")]);
        cancelled_outcome.cancelled = true;

        let report = FailureAggregator::default().aggregate(2, vec![cancelled_outcome]);
        assert!(report.cancelled);
    }
}

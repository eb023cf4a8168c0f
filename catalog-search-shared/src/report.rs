//! Bulk operation outcome types.
//!
//! These types describe the result of one bulk ingestion call: per-item
//! outcomes with failure causes and the aggregate report returned to the
//! caller.

use serde::{Deserialize, Serialize};

/// Classification of a per-item write failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureCause {
    /// Version or update conflict reported by the index.
    Conflict,
    /// The document could not be parsed or mapped by the index.
    MalformedDocument,
    /// The index rejected the item under load (e.g., HTTP 429).
    ResourceExhausted,
    /// The request carrying the item failed at the transport level.
    Transport,
    /// The item was not (re-)submitted because the operation was cancelled.
    Cancelled,
}

impl std::fmt::Display for FailureCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Conflict => "conflict",
            Self::MalformedDocument => "malformed-document",
            Self::ResourceExhausted => "resource-exhausted",
            Self::Transport => "transport",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Terminal status of a single record within a bulk operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStatus {
    /// The record was written successfully.
    Succeeded,
    /// The record failed on every attempt; the last observed cause is kept.
    Failed(FailureCause),
}

/// Per-record result of a bulk operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemOutcome {
    /// The record's identifier.
    pub id: String,
    /// Terminal status.
    pub status: ItemStatus,
    /// Number of write attempts issued for this record.
    pub attempts: u32,
}

impl ItemOutcome {
    /// Create a succeeded outcome.
    pub fn succeeded(id: impl Into<String>, attempts: u32) -> Self {
        Self {
            id: id.into(),
            status: ItemStatus::Succeeded,
            attempts,
        }
    }

    /// Create a failed outcome with its last observed cause.
    pub fn failed(id: impl Into<String>, cause: FailureCause, attempts: u32) -> Self {
        Self {
            id: id.into(),
            status: ItemStatus::Failed(cause),
            attempts,
        }
    }

    /// Whether this outcome is a failure.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, ItemStatus::Failed(_))
    }
}

/// Overall status of a bulk ingestion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationStatus {
    /// Every record succeeded.
    Success,
    /// Some records failed but the failure ratio stayed below the threshold.
    PartialSuccess,
    /// The failure ratio reached the configured threshold.
    Failed,
}

/// Aggregate result of one bulk ingestion call.
///
/// This is the sole success return value of `bulk_upsert`: expected partial
/// failures are listed here rather than raised as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationReport {
    /// Total number of records submitted.
    pub total: usize,
    /// Number of records that succeeded.
    pub succeeded: usize,
    /// Permanently failed records, in original input order.
    pub failed: Vec<ItemOutcome>,
    /// Overall status.
    pub status: OperationStatus,
    /// Whether the operation was cancelled before completing.
    pub cancelled: bool,
}

impl OperationReport {
    /// Report for an empty input: immediate success.
    pub fn empty() -> Self {
        Self {
            total: 0,
            succeeded: 0,
            failed: Vec::new(),
            status: OperationStatus::Success,
            cancelled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_cause_display() {
        assert_eq!(FailureCause::MalformedDocument.to_string(), "malformed-document");
        assert_eq!(FailureCause::ResourceExhausted.to_string(), "resource-exhausted");
        assert_eq!(FailureCause::Transport.to_string(), "transport");
    }

    #[test]
    fn test_item_outcome_status() {
        let ok = ItemOutcome::succeeded("sku-1", 1);
        assert!(!ok.is_failed());

        let bad = ItemOutcome::failed("sku-2", FailureCause::Conflict, 3);
        assert!(bad.is_failed());
        assert_eq!(bad.attempts, 3);
    }

    #[test]
    fn test_empty_report() {
        let report = OperationReport::empty();
        assert_eq!(report.status, OperationStatus::Success);
        assert_eq!(report.total, 0);
        assert!(!report.cancelled);
    }
}

//! Ingestion pipeline.
//!
//! Coordinates the planner, writer, retry coordinator and aggregator for one
//! bulk ingestion call: plan batches, process them with bounded parallelism,
//! fold every outcome into one operation report.

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use tracing::{info, instrument};

use crate::cancel::CancelSignal;
use crate::errors::IngestError;
use crate::planner;
use crate::report::FailureAggregator;
use crate::retry::{BatchOutcome, RetryCoordinator, RetryPolicy};
use crate::sinks::{IngestEventSink, MetricsSink, NoopEventSink, NoopMetricsSink};
use crate::writer::BulkWriter;
use catalog_search_repository::SearchIndexBackend;
use catalog_search_shared::{OperationReport, ProductRecord};

/// Configuration for the ingestion pipeline.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Number of records per bulk call.
    pub batch_size: usize,
    /// Number of batches processed concurrently. Parallelism is a throughput
    /// knob, not a correctness requirement: serial execution produces an
    /// identical report.
    pub parallelism: usize,
    /// Retry bounds and backoff shape.
    pub retry: RetryPolicy,
    /// Failure ratio at which the whole operation is classified `Failed`.
    pub failure_threshold: f64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            parallelism: 4,
            retry: RetryPolicy::default(),
            failure_threshold: 1.0,
        }
    }
}

impl IngestConfig {
    /// Validate the configuration before any processing starts.
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.batch_size == 0 {
            return Err(IngestError::config("batch size must be > 0"));
        }
        if self.parallelism == 0 {
            return Err(IngestError::config("parallelism must be >= 1"));
        }
        if !(self.failure_threshold > 0.0 && self.failure_threshold <= 1.0) {
            return Err(IngestError::config(
                "failure threshold must be within (0, 1]",
            ));
        }
        self.retry.validate()
    }
}

/// The bulk ingestion pipeline.
///
/// Batches are independent units of work (writes are idempotent upserts), so
/// they run concurrently against the shared backend transport; each batch
/// owns its own retry bookkeeping.
pub struct IngestPipeline {
    backend: Arc<dyn SearchIndexBackend>,
    config: IngestConfig,
    events: Arc<dyn IngestEventSink>,
    metrics: Arc<dyn MetricsSink>,
}

impl IngestPipeline {
    /// Create a pipeline with default configuration and no-op sinks.
    pub fn new(backend: Arc<dyn SearchIndexBackend>) -> Self {
        Self::with_config(backend, IngestConfig::default())
    }

    /// Create a pipeline with custom configuration and no-op sinks.
    pub fn with_config(backend: Arc<dyn SearchIndexBackend>, config: IngestConfig) -> Self {
        Self {
            backend,
            config,
            events: Arc::new(NoopEventSink),
            metrics: Arc::new(NoopMetricsSink),
        }
    }

    /// Replace the event and metrics sinks.
    pub fn with_sinks(
        mut self,
        events: Arc<dyn IngestEventSink>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        self.events = events;
        self.metrics = metrics;
        self
    }

    /// Run one bulk ingestion call to completion.
    ///
    /// Returns a report even when items failed; only configuration errors
    /// and an unreachable index abort the call. Raising the cancel signal
    /// stops new submissions and retries promptly; outcomes of work already
    /// issued are still folded into the (then flagged) report.
    #[instrument(skip(self, records, cancel), fields(record_count = records.len()))]
    pub async fn run(
        &self,
        records: Vec<ProductRecord>,
        cancel: CancelSignal,
    ) -> Result<OperationReport, IngestError> {
        self.config.validate()?;

        let total = records.len();
        if total == 0 {
            return Ok(OperationReport::empty());
        }

        let started = Instant::now();
        let batches = planner::plan(records, self.config.batch_size)?;
        let batch_count = batches.len();

        let coordinator = RetryCoordinator::new(
            BulkWriter::new(self.backend.clone()),
            self.config.retry.clone(),
            self.events.clone(),
        );

        let results: Vec<Result<BatchOutcome, IngestError>> = stream::iter(batches)
            .map(|batch| {
                let coordinator = &coordinator;
                let cancel = cancel.clone();
                async move {
                    if cancel.is_cancelled() {
                        Ok(BatchOutcome::cancelled_before_submit(batch))
                    } else {
                        coordinator.run_batch(batch, cancel).await
                    }
                }
            })
            .buffer_unordered(self.config.parallelism)
            .collect()
            .await;

        let mut outcomes = Vec::with_capacity(results.len());
        for result in results {
            outcomes.push(result?);
        }

        let report =
            FailureAggregator::new(self.config.failure_threshold).aggregate(total, outcomes);

        let duration = started.elapsed();
        self.metrics
            .record_bulk_operation(duration, report.succeeded, report.failed.len());

        info!(
            total,
            batches = batch_count,
            succeeded = report.succeeded,
            failed = report.failed.len(),
            duration_ms = duration.as_millis() as u64,
            status = ?report.status,
            cancelled = report.cancelled,
            "Bulk ingestion completed"
        );

        Ok(report)
    }
}

//! Event and metrics sinks.
//!
//! The pipeline reports per-batch lifecycle events and per-operation metrics
//! through these injected capabilities rather than ambient global state.
//! Production wiring decides where events go; tests inject recorders.

use std::time::Duration;

/// Receives per-batch lifecycle events from the ingestion pipeline.
pub trait IngestEventSink: Send + Sync {
    /// A batch is about to be submitted for the first time.
    fn batch_started(&self, batch_index: usize, size: usize);

    /// A previously failed item is about to be re-submitted.
    fn retry_scheduled(&self, batch_index: usize, id: &str, attempt: u32);

    /// A batch reached a terminal state.
    fn batch_completed(&self, batch_index: usize, succeeded: usize, failed: usize);
}

/// Receives per-operation metrics.
pub trait MetricsSink: Send + Sync {
    /// A bulk ingestion call finished.
    fn record_bulk_operation(&self, duration: Duration, succeeded: usize, failed: usize);

    /// A search call finished.
    fn record_search(&self, duration: Duration);
}

/// Event sink that discards all events.
#[derive(Debug, Default)]
pub struct NoopEventSink;

impl IngestEventSink for NoopEventSink {
    fn batch_started(&self, _batch_index: usize, _size: usize) {}
    fn retry_scheduled(&self, _batch_index: usize, _id: &str, _attempt: u32) {}
    fn batch_completed(&self, _batch_index: usize, _succeeded: usize, _failed: usize) {}
}

/// Metrics sink that discards all measurements.
#[derive(Debug, Default)]
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {
    fn record_bulk_operation(&self, _duration: Duration, _succeeded: usize, _failed: usize) {}
    fn record_search(&self, _duration: Duration) {}
}

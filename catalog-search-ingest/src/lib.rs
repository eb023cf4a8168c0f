//! # Catalog Search Ingest
//!
//! This crate provides the bulk ingestion pipeline for loading product
//! records into the search index.
//!
//! ## Architecture
//!
//! The pipeline follows a Planner-Writer-Retry-Aggregate flow:
//!
//! 1. **Planner**: Splits the input into fixed-size batches
//! 2. **Writer**: Submits one batch as a single bulk upsert
//! 3. **Retry**: Re-submits only the failed subset, bounded by policy
//! 4. **Aggregator**: Folds per-batch outcomes into one operation report

pub mod cancel;
pub mod errors;
pub mod pipeline;
pub mod planner;
pub mod report;
pub mod retry;
pub mod sinks;
pub mod writer;

pub use cancel::{cancellation, CancelHandle, CancelSignal};
pub use errors::IngestError;
pub use pipeline::{IngestConfig, IngestPipeline};
pub use retry::RetryPolicy;

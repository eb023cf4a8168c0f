//! # Catalog Search Shared
//!
//! Domain types shared across the catalog search crates: product records,
//! search parameters, and bulk operation reports.

pub mod record;
pub mod report;
pub mod search;

pub use record::ProductRecord;
pub use report::{FailureCause, ItemOutcome, ItemStatus, OperationReport, OperationStatus};
pub use search::{SearchPage, SearchParameters, SortDirection, SortSpec};

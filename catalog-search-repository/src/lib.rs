//! # Catalog Search Repository
//!
//! This crate provides the query construction path and the search index
//! backend abstraction for the catalog search service. It includes the error
//! taxonomy, the typed query builder, the `SearchIndexBackend` trait, a
//! concrete OpenSearch implementation, and an in-memory backend for tests.

pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod opensearch;
pub mod query;

pub use errors::SearchError;
pub use interfaces::{BulkItemStatus, SearchIndexBackend};
pub use memory::InMemoryBackend;
pub use opensearch::OpenSearchBackend;
pub use query::{QueryBuilder, QueryConfig, QueryDocument};

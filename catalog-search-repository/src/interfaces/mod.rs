//! Abstract interfaces for search index backends.

mod search_backend;

pub use search_backend::{BulkItemStatus, SearchIndexBackend};

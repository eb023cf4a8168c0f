//! Product record type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A product record to be stored in the search index.
///
/// The `id` is the caller-supplied upsert key: submitting the same id twice
/// converges to the same stored document, never a duplicate. The document
/// body is opaque to the ingestion core; the index mapping decides which
/// fields are searchable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Unique identifier of the product (e.g., a SKU).
    pub id: String,
    /// The document body indexed under this id.
    pub document: Value,
}

impl ProductRecord {
    /// Create a new product record.
    pub fn new(id: impl Into<String>, document: Value) -> Self {
        Self {
            id: id.into(),
            document,
        }
    }
}

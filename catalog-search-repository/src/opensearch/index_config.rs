//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the product
//! catalog index.

use serde_json::{json, Value};

/// Default name of the catalog index.
pub const DEFAULT_INDEX: &str = "products";

/// Get the index settings and mappings for the product catalog index.
///
/// The configuration includes:
/// - **search_as_you_type** on `name` for autocomplete-style matching
/// - **text** on `description` for full-text matching
/// - **Keyword/numeric fields** for filtering and sorting
///
/// Dynamic mapping stays enabled so opaque document fields beyond these are
/// still indexed with sensible defaults.
pub fn product_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "dynamic": true,
            "properties": {
                "name": {
                    "type": "search_as_you_type",
                    "fields": {
                        "raw": {
                            "type": "keyword"
                        }
                    }
                },
                "description": {
                    "type": "text"
                },
                "brand": {
                    "type": "keyword"
                },
                "price": {
                    "type": "double"
                }
            }
        }
    })
}

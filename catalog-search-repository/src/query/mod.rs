//! Catalog query construction.
//!
//! This module translates validated `SearchParameters` into a structured
//! `QueryDocument`. The document is built from explicit clause variants and
//! only serialized to the index wire format at the transport boundary.

use serde_json::{json, Value};

use crate::errors::SearchError;
use catalog_search_shared::{SearchParameters, SortDirection};

/// Primary match field, boosted over the secondary field.
pub const PRIMARY_FIELD: &str = "name";

/// Secondary match field, weight 1.0.
pub const SECONDARY_FIELD: &str = "description";

/// Configuration for query construction.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Maximum allowed page size.
    pub max_page_size: u32,
    /// Relative weight boosting the primary field over the secondary one.
    pub primary_boost: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_page_size: 100,
            primary_boost: 2.0,
        }
    }
}

/// A match field with its relative weight.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWeight {
    /// Field name.
    pub name: String,
    /// Relative weight; 1.0 means no boost.
    pub weight: f64,
}

impl FieldWeight {
    fn wire_name(&self) -> String {
        if (self.weight - 1.0).abs() < f64::EPSILON {
            self.name.clone()
        } else {
            format!("{}^{}", self.name, self.weight)
        }
    }
}

/// Multi-field weighted match clause.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchClause {
    /// Query text.
    pub text: String,
    /// Fields to match against, each with a weight.
    pub fields: Vec<FieldWeight>,
}

/// Explicit sort clause.
#[derive(Debug, Clone, PartialEq)]
pub struct SortClause {
    /// Field to sort by.
    pub field: String,
    /// Sort order.
    pub order: SortDirection,
}

/// A validated, immutable search query ready for execution.
///
/// The sort clause is present only when the caller requested an explicit
/// sort; its absence means index relevance ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDocument {
    /// The match clause.
    pub match_clause: MatchClause,
    /// Offset of the first result, `(page - 1) * page_size`.
    pub from: u64,
    /// Maximum number of results, equal to the page size.
    pub size: u64,
    /// Optional explicit sort.
    pub sort: Option<SortClause>,
}

impl QueryDocument {
    /// Serialize the document to the index wire format.
    ///
    /// Produces `{query: {multi_match: ...}, from, size}` plus a `sort` array
    /// only when an explicit sort was requested.
    pub fn to_wire(&self) -> Value {
        let fields: Vec<String> = self
            .match_clause
            .fields
            .iter()
            .map(FieldWeight::wire_name)
            .collect();

        let mut body = json!({
            "query": {
                "multi_match": {
                    "query": self.match_clause.text,
                    "fields": fields
                }
            },
            "from": self.from,
            "size": self.size
        });

        if let Some(sort) = &self.sort {
            let mut entry = serde_json::Map::new();
            entry.insert(sort.field.clone(), json!({ "order": sort.order.as_str() }));
            body["sort"] = Value::Array(vec![Value::Object(entry)]);
        }

        body
    }
}

/// Pure translation of search parameters into a query document.
///
/// Holds no shared state; safe to call concurrently without synchronization.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    config: QueryConfig,
}

impl QueryBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with custom configuration.
    pub fn with_config(config: QueryConfig) -> Self {
        Self { config }
    }

    /// Validate the parameters and build a query document.
    ///
    /// Validation failures return `SearchError::InvalidParameters` immediately,
    /// before any index interaction.
    pub fn build(&self, params: &SearchParameters) -> Result<QueryDocument, SearchError> {
        if params.query.trim().is_empty() {
            return Err(SearchError::invalid_parameters("query text is empty"));
        }
        if params.page < 1 {
            return Err(SearchError::invalid_parameters("page must be >= 1"));
        }
        if params.page_size < 1 {
            return Err(SearchError::invalid_parameters("page size must be >= 1"));
        }
        if params.page_size > self.config.max_page_size {
            return Err(SearchError::invalid_parameters(format!(
                "page size {} exceeds maximum {}",
                params.page_size, self.config.max_page_size
            )));
        }

        let from = u64::from(params.page - 1) * u64::from(params.page_size);

        Ok(QueryDocument {
            match_clause: MatchClause {
                text: params.query.clone(),
                fields: vec![
                    FieldWeight {
                        name: PRIMARY_FIELD.to_string(),
                        weight: self.config.primary_boost,
                    },
                    FieldWeight {
                        name: SECONDARY_FIELD.to_string(),
                        weight: 1.0,
                    },
                ],
            },
            from,
            size: u64::from(params.page_size),
            sort: params.sort.as_ref().map(|s| SortClause {
                field: s.field.clone(),
                order: s.direction,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(params: &SearchParameters) -> Result<QueryDocument, SearchError> {
        QueryBuilder::new().build(params)
    }

    #[test]
    fn test_offset_first_page() {
        let doc = build(&SearchParameters::new("mouse", 1, 20)).unwrap();
        assert_eq!(doc.from, 0);
        assert_eq!(doc.size, 20);
    }

    #[test]
    fn test_offset_third_page() {
        let doc = build(&SearchParameters::new("mouse", 3, 20)).unwrap();
        assert_eq!(doc.from, 40);
        assert_eq!(doc.size, 20);
    }

    #[test]
    fn test_rejects_page_zero() {
        let result = build(&SearchParameters::new("mouse", 0, 20));
        assert!(matches!(result, Err(SearchError::InvalidParameters(_))));
    }

    #[test]
    fn test_rejects_page_size_zero() {
        let result = build(&SearchParameters::new("mouse", 1, 0));
        assert!(matches!(result, Err(SearchError::InvalidParameters(_))));
    }

    #[test]
    fn test_rejects_empty_query() {
        let result = build(&SearchParameters::new("   ", 1, 20));
        assert!(matches!(result, Err(SearchError::InvalidParameters(_))));
    }

    #[test]
    fn test_rejects_page_size_above_maximum() {
        let builder = QueryBuilder::with_config(QueryConfig {
            max_page_size: 50,
            primary_boost: 2.0,
        });
        let result = builder.build(&SearchParameters::new("mouse", 1, 51));
        assert!(matches!(result, Err(SearchError::InvalidParameters(_))));
    }

    #[test]
    fn test_wire_format_without_sort() {
        let doc = build(&SearchParameters::new("wireless mouse", 2, 10)).unwrap();
        let wire = doc.to_wire();

        assert_eq!(wire["query"]["multi_match"]["query"], "wireless mouse");
        let fields = wire["query"]["multi_match"]["fields"].as_array().unwrap();
        assert_eq!(fields[0], "name^2");
        assert_eq!(fields[1], "description");
        assert_eq!(wire["from"], 10);
        assert_eq!(wire["size"], 10);

        // No explicit sort means no sort clause at all
        assert!(wire.get("sort").is_none());
    }

    #[test]
    fn test_wire_format_with_sort() {
        let params = SearchParameters::new("mouse", 1, 10)
            .with_sort("price", catalog_search_shared::SortDirection::Desc);
        let doc = build(&params).unwrap();
        let wire = doc.to_wire();

        let sort = wire["sort"].as_array().unwrap();
        assert_eq!(sort.len(), 1);
        assert_eq!(sort[0]["price"]["order"], "desc");
    }

    #[test]
    fn test_primary_boost_configurable() {
        let builder = QueryBuilder::with_config(QueryConfig {
            max_page_size: 100,
            primary_boost: 3.5,
        });
        let doc = builder.build(&SearchParameters::new("mouse", 1, 10)).unwrap();
        let wire = doc.to_wire();

        let fields = wire["query"]["multi_match"]["fields"].as_array().unwrap();
        assert_eq!(fields[0], "name^3.5");
    }
}

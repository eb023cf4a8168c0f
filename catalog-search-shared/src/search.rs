//! Search parameter and result types.

use serde::{Deserialize, Serialize};

use crate::record::ProductRecord;

/// Direction of an explicit sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// The wire representation used by the index ("asc" or "desc").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// An explicit sort on a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort by.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Create a sort spec for the given field and direction.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Parameters for a paginated catalog search.
///
/// Validation (page >= 1, page size bounds, non-empty query text) happens in
/// the query builder, before any index interaction. Parameters are immutable
/// once validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParameters {
    /// Free-text query.
    pub query: String,
    /// 1-based page number.
    pub page: u32,
    /// Number of results per page.
    pub page_size: u32,
    /// Optional explicit sort. `None` means index relevance ordering.
    pub sort: Option<SortSpec>,
}

impl SearchParameters {
    /// Create parameters with relevance ordering.
    pub fn new(query: impl Into<String>, page: u32, page_size: u32) -> Self {
        Self {
            query: query.into(),
            page,
            page_size,
            sort: None,
        }
    }

    /// Set an explicit sort.
    pub fn with_sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec::new(field, direction));
        self
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Matched records, in index-returned order.
    pub records: Vec<ProductRecord>,
    /// Total number of matches across all pages.
    pub total: u64,
}

impl SearchPage {
    /// An empty result page.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            total: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_direction_wire_format() {
        assert_eq!(SortDirection::Asc.as_str(), "asc");
        assert_eq!(SortDirection::Desc.as_str(), "desc");
    }

    #[test]
    fn test_parameters_builder() {
        let params = SearchParameters::new("wireless mouse", 2, 25)
            .with_sort("price", SortDirection::Asc);

        assert_eq!(params.page, 2);
        assert_eq!(params.page_size, 25);
        assert_eq!(
            params.sort,
            Some(SortSpec::new("price", SortDirection::Asc))
        );
    }

    #[test]
    fn test_empty_page() {
        let page = SearchPage::empty();
        assert!(page.records.is_empty());
        assert_eq!(page.total, 0);
    }
}

//! In-memory search backend.
//!
//! A fake `SearchIndexBackend` backed by a `HashMap`, used in tests and local
//! development. Matching is substring-based over the configured match fields;
//! results without an explicit sort are ordered by id for determinism.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::errors::SearchError;
use crate::interfaces::{BulkItemStatus, SearchIndexBackend};
use crate::query::QueryDocument;
use catalog_search_shared::{ProductRecord, SearchPage, SortDirection};

/// In-memory backend storing documents keyed by record id.
#[derive(Default)]
pub struct InMemoryBackend {
    docs: RwLock<HashMap<String, Value>>,
}

impl InMemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    /// Whether the backend holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }

    fn matches(doc: &Value, fields: &[String], needle: &str) -> bool {
        fields.iter().any(|field| {
            doc.get(field)
                .and_then(Value::as_str)
                .map(|text| text.to_lowercase().contains(needle))
                .unwrap_or(false)
        })
    }

    fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
        let va = a.get(field);
        let vb = b.get(field);
        match (va, vb) {
            (Some(Value::Number(x)), Some(Value::Number(y))) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }
}

#[async_trait]
impl SearchIndexBackend for InMemoryBackend {
    async fn search(&self, doc: &QueryDocument) -> Result<SearchPage, SearchError> {
        let needle = doc.match_clause.text.to_lowercase();
        let fields: Vec<String> = doc
            .match_clause
            .fields
            .iter()
            .map(|f| f.name.clone())
            .collect();

        let store = self.docs.read().await;
        let mut matched: Vec<(String, Value)> = store
            .iter()
            .filter(|(_, body)| Self::matches(body, &fields, &needle))
            .map(|(id, body)| (id.clone(), body.clone()))
            .collect();
        drop(store);

        match &doc.sort {
            Some(sort) => {
                matched.sort_by(|(_, a), (_, b)| {
                    let ord = Self::compare_field(a, b, &sort.field);
                    match sort.order {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                });
            }
            None => matched.sort_by(|(a, _), (b, _)| a.cmp(b)),
        }

        let total = matched.len() as u64;
        let records: Vec<ProductRecord> = matched
            .into_iter()
            .skip(doc.from as usize)
            .take(doc.size as usize)
            .map(|(id, body)| ProductRecord::new(id, body))
            .collect();

        Ok(SearchPage { records, total })
    }

    async fn bulk_upsert(&self, records: &[ProductRecord]) -> Result<Vec<BulkItemStatus>, SearchError> {
        let mut store = self.docs.write().await;
        let mut statuses = Vec::with_capacity(records.len());

        for record in records {
            store.insert(record.id.clone(), record.document.clone());
            statuses.push(BulkItemStatus::ok(&record.id));
        }

        Ok(statuses)
    }

    async fn ensure_index_exists(&self) -> Result<(), SearchError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryBuilder;
    use catalog_search_shared::SearchParameters;
    use serde_json::json;

    fn record(id: &str, name: &str, price: f64) -> ProductRecord {
        ProductRecord::new(id, json!({ "name": name, "description": "", "price": price }))
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let backend = InMemoryBackend::new();
        let batch = vec![record("sku-1", "Widget", 1.0), record("sku-2", "Gadget", 2.0)];

        backend.bulk_upsert(&batch).await.unwrap();
        backend.bulk_upsert(&batch).await.unwrap();

        assert_eq!(backend.len().await, 2);
    }

    #[tokio::test]
    async fn test_search_matches_and_paginates() {
        let backend = InMemoryBackend::new();
        let batch: Vec<ProductRecord> = (0..5)
            .map(|i| record(&format!("sku-{}", i), &format!("Widget {}", i), i as f64))
            .collect();
        backend.bulk_upsert(&batch).await.unwrap();

        let doc = QueryBuilder::new()
            .build(&SearchParameters::new("widget", 2, 2))
            .unwrap();
        let page = backend.search(&doc).await.unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].id, "sku-2");
    }

    #[tokio::test]
    async fn test_search_explicit_sort() {
        let backend = InMemoryBackend::new();
        backend
            .bulk_upsert(&[
                record("a", "Widget", 3.0),
                record("b", "Widget", 1.0),
                record("c", "Widget", 2.0),
            ])
            .await
            .unwrap();

        let params = SearchParameters::new("widget", 1, 10)
            .with_sort("price", SortDirection::Desc);
        let doc = QueryBuilder::new().build(&params).unwrap();
        let page = backend.search(&doc).await.unwrap();

        let prices: Vec<f64> = page
            .records
            .iter()
            .map(|r| r.document["price"].as_f64().unwrap())
            .collect();
        assert_eq!(prices, vec![3.0, 2.0, 1.0]);
    }

    #[tokio::test]
    async fn test_search_no_match() {
        let backend = InMemoryBackend::new();
        backend.bulk_upsert(&[record("a", "Widget", 1.0)]).await.unwrap();

        let doc = QueryBuilder::new()
            .build(&SearchParameters::new("nonexistent", 1, 10))
            .unwrap();
        let page = backend.search(&doc).await.unwrap();

        assert_eq!(page.total, 0);
        assert!(page.records.is_empty());
    }
}

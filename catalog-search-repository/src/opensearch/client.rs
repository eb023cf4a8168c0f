//! OpenSearch backend implementation.
//!
//! This module provides the concrete implementation of `SearchIndexBackend`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::{BulkItemStatus, SearchIndexBackend};
use crate::opensearch::index_config::product_index_settings;
use crate::query::QueryDocument;
use catalog_search_shared::{FailureCause, ProductRecord, SearchPage};

/// OpenSearch backend implementation.
///
/// Provides full-text catalog search and bulk upserts using OpenSearch as
/// the backing index. The underlying transport pools connections and is safe
/// to share across concurrent batch workers.
pub struct OpenSearchBackend {
    client: OpenSearch,
    index: String,
}

impl OpenSearchBackend {
    /// Create a new backend connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index` - The catalog index name
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchBackend)` - A new backend instance
    /// * `Err(SearchError)` - If connection setup fails
    pub fn new(url: &str, index: impl Into<String>) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);
        let index = index.into();

        info!(url = %url, index = %index, "Created OpenSearch backend");

        Ok(Self { client, index })
    }

    /// Classify a request-level transport failure.
    ///
    /// Timeouts map to `Timeout`, unreachable-host failures to `Connection`,
    /// anything else to `Repository` carrying the operation name.
    fn classify_request_error(operation: &str, err: opensearch::Error) -> SearchError {
        if err.is_timeout() {
            return SearchError::timeout(operation);
        }

        let msg = err.to_string();
        let lower = msg.to_lowercase();
        if lower.contains("connect") || lower.contains("refused") || lower.contains("dns") {
            SearchError::connection(msg)
        } else {
            SearchError::repository(operation, msg)
        }
    }

    /// Classify a per-item failure from the bulk response.
    fn classify_item_failure(status: u16, error_type: Option<&str>) -> FailureCause {
        if status == 409 {
            return FailureCause::Conflict;
        }
        if status == 429 {
            return FailureCause::ResourceExhausted;
        }

        if let Some(kind) = error_type {
            let kind = kind.to_lowercase();
            if kind.contains("conflict") {
                return FailureCause::Conflict;
            }
            if kind.contains("parse") || kind.contains("parsing") || kind.contains("mapper") {
                return FailureCause::MalformedDocument;
            }
            if kind.contains("rejected") || kind.contains("too_many") {
                return FailureCause::ResourceExhausted;
            }
        }

        if status == 400 {
            return FailureCause::MalformedDocument;
        }

        FailureCause::Transport
    }

    /// Parse a single search hit into a record.
    ///
    /// Returns `None` for hits without an id; relevance ordering of the
    /// remaining hits is preserved.
    fn parse_hit(hit: &Value) -> Option<ProductRecord> {
        let id = hit["_id"].as_str()?;
        let source = hit.get("_source").cloned().unwrap_or(Value::Null);
        Some(ProductRecord::new(id, source))
    }
}

#[async_trait]
impl SearchIndexBackend for OpenSearchBackend {
    async fn search(&self, doc: &QueryDocument) -> Result<SearchPage, SearchError> {
        let response = self
            .client
            .search(SearchParts::Index(&[&self.index]))
            .body(doc.to_wire())
            .send()
            .await
            .map_err(|e| Self::classify_request_error("search", e))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Err(SearchError::not_found(format!(
                "index {} does not exist",
                self.index
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Search request failed");
            return Err(SearchError::repository("search", format!(
                "search failed with status {}: {}",
                status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let total = body["hits"]["total"]["value"].as_u64().unwrap_or(0);
        let records: Vec<ProductRecord> = body["hits"]["hits"]
            .as_array()
            .map(|hits| {
                hits.iter()
                    .filter_map(|hit| {
                        let parsed = Self::parse_hit(hit);
                        if parsed.is_none() {
                            warn!("Skipping search hit without an id");
                        }
                        parsed
                    })
                    .collect()
            })
            .unwrap_or_default();

        debug!(total = total, returned = records.len(), "Search completed");

        Ok(SearchPage { records, total })
    }

    /// Write the batch in one `_bulk` call using `index` actions.
    ///
    /// `index` replaces any existing document under the same id, so
    /// re-submitting an identical batch converges instead of duplicating.
    async fn bulk_upsert(&self, records: &[ProductRecord]) -> Result<Vec<BulkItemStatus>, SearchError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(records.len() * 2);
        for record in records {
            body.push(json!({ "index": { "_index": self.index, "_id": record.id } }).into());
            body.push(record.document.clone().into());
        }

        let response = self
            .client
            .bulk(BulkParts::Index(&self.index))
            .body(body)
            .send()
            .await
            .map_err(|e| Self::classify_request_error("bulk_upsert", e))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Bulk request failed");
            return Err(SearchError::repository("bulk_upsert", format!(
                "bulk failed with status {}: {}",
                status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let items = body["items"]
            .as_array()
            .ok_or_else(|| SearchError::parse("bulk response has no items array"))?;

        // Items come back in request order; fall back to the request id when
        // the response omits one.
        let mut statuses = Vec::with_capacity(records.len());
        for (record, item) in records.iter().zip(items) {
            let entry = &item["index"];
            let id = entry["_id"].as_str().unwrap_or(&record.id).to_string();
            let item_status = entry["status"].as_u64().unwrap_or(0) as u16;

            if (200..300).contains(&item_status) {
                statuses.push(BulkItemStatus::ok(id));
            } else {
                let error_type = entry["error"]["type"].as_str();
                let cause = Self::classify_item_failure(item_status, error_type);
                debug!(id = %id, status = item_status, cause = %cause, "Bulk item failed");
                statuses.push(BulkItemStatus::failed(id, cause));
            }
        }

        // Anything the response did not account for gets a transport cause
        // rather than being silently dropped.
        for record in records.iter().skip(items.len()) {
            statuses.push(BulkItemStatus::failed(&record.id, FailureCause::Transport));
        }

        Ok(statuses)
    }

    async fn ensure_index_exists(&self) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[&self.index]))
            .send()
            .await
            .map_err(|e| Self::classify_request_error("ensure_index", e))?;

        if response.status_code().is_success() {
            debug!(index = %self.index, "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.index))
            .body(product_index_settings())
            .send()
            .await
            .map_err(|e| Self::classify_request_error("ensure_index", e))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::repository("ensure_index", format!(
                "index creation failed with status {}: {}",
                status, body
            )));
        }

        info!(index = %self.index, "Created catalog index");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| Self::classify_request_error("health_check", e))?;

        if !response.status_code().is_success() {
            return Ok(false);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let status = body["status"].as_str().unwrap_or("red");
        Ok(status == "green" || status == "yellow")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_item_conflict() {
        let cause = OpenSearchBackend::classify_item_failure(409, Some("version_conflict_engine_exception"));
        assert_eq!(cause, FailureCause::Conflict);
    }

    #[test]
    fn test_classify_item_malformed() {
        let cause = OpenSearchBackend::classify_item_failure(400, Some("mapper_parsing_exception"));
        assert_eq!(cause, FailureCause::MalformedDocument);

        let cause = OpenSearchBackend::classify_item_failure(500, Some("document_parsing_exception"));
        assert_eq!(cause, FailureCause::MalformedDocument);
    }

    #[test]
    fn test_classify_item_resource_exhausted() {
        let cause = OpenSearchBackend::classify_item_failure(429, None);
        assert_eq!(cause, FailureCause::ResourceExhausted);

        let cause = OpenSearchBackend::classify_item_failure(503, Some("es_rejected_execution_exception"));
        assert_eq!(cause, FailureCause::ResourceExhausted);
    }

    #[test]
    fn test_classify_item_transport_fallback() {
        let cause = OpenSearchBackend::classify_item_failure(503, None);
        assert_eq!(cause, FailureCause::Transport);
    }

    #[test]
    fn test_parse_hit() {
        let hit = json!({
            "_id": "sku-42",
            "_source": { "name": "Widget", "price": 9.99 },
            "_score": 1.5
        });

        let record = OpenSearchBackend::parse_hit(&hit).unwrap();
        assert_eq!(record.id, "sku-42");
        assert_eq!(record.document["name"], "Widget");
    }

    #[test]
    fn test_parse_hit_without_id() {
        let hit = json!({ "_source": { "name": "Orphan" } });
        assert!(OpenSearchBackend::parse_hit(&hit).is_none());
    }
}

//! Catalog search service facade.
//!
//! Binds the query builder, the search backend and the ingestion pipeline
//! behind one `CatalogRepository` surface. Callers never see query documents
//! or batches, only validated parameters and reports.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::CatalogError;
use catalog_search_ingest::sinks::{IngestEventSink, MetricsSink, NoopMetricsSink};
use catalog_search_ingest::{CancelSignal, IngestConfig, IngestPipeline};
use catalog_search_repository::{QueryBuilder, QueryConfig, SearchIndexBackend};
use catalog_search_shared::{OperationReport, ProductRecord, SearchPage, SearchParameters};

/// Read and write surface of the product catalog.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Execute a paged catalog search.
    async fn search(&self, params: &SearchParameters) -> Result<SearchPage, CatalogError>;

    /// Idempotently upsert a set of product records into the index.
    async fn bulk_upsert(
        &self,
        records: Vec<ProductRecord>,
    ) -> Result<OperationReport, CatalogError>;
}

/// The catalog search service.
pub struct CatalogSearchService {
    backend: Arc<dyn SearchIndexBackend>,
    builder: QueryBuilder,
    pipeline: IngestPipeline,
    metrics: Arc<dyn MetricsSink>,
}

impl CatalogSearchService {
    /// Create a service with default configuration over the given backend.
    pub fn new(backend: Arc<dyn SearchIndexBackend>) -> Self {
        Self::with_config(backend, QueryConfig::default(), IngestConfig::default())
    }

    /// Create a service with custom query and ingestion configuration.
    pub fn with_config(
        backend: Arc<dyn SearchIndexBackend>,
        query_config: QueryConfig,
        ingest_config: IngestConfig,
    ) -> Self {
        Self {
            builder: QueryBuilder::with_config(query_config),
            pipeline: IngestPipeline::with_config(backend.clone(), ingest_config),
            metrics: Arc::new(NoopMetricsSink),
            backend,
        }
    }

    /// Replace the event and metrics sinks.
    pub fn with_sinks(
        mut self,
        events: Arc<dyn IngestEventSink>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        self.pipeline = self.pipeline.with_sinks(events, metrics.clone());
        self.metrics = metrics;
        self
    }

    /// Execute a paged catalog search.
    ///
    /// Parameters are validated before any index interaction; invalid
    /// parameters never reach the backend.
    #[instrument(skip(self, params), fields(query = %params.query, page = params.page))]
    pub async fn search(&self, params: &SearchParameters) -> Result<SearchPage, CatalogError> {
        let document = self.builder.build(params)?;

        let started = Instant::now();
        let page = self.backend.search(&document).await?;
        self.metrics.record_search(started.elapsed());

        info!(
            total = page.total,
            returned = page.records.len(),
            "Search completed"
        );
        Ok(page)
    }

    /// Idempotently upsert a set of product records into the index.
    pub async fn bulk_upsert(
        &self,
        records: Vec<ProductRecord>,
    ) -> Result<OperationReport, CatalogError> {
        self.bulk_upsert_with_cancel(records, CancelSignal::none())
            .await
    }

    /// Bulk upsert that can be interrupted through the given cancel signal.
    pub async fn bulk_upsert_with_cancel(
        &self,
        records: Vec<ProductRecord>,
        cancel: CancelSignal,
    ) -> Result<OperationReport, CatalogError> {
        let report = self.pipeline.run(records, cancel).await?;
        Ok(report)
    }
}

#[async_trait]
impl CatalogRepository for CatalogSearchService {
    async fn search(&self, params: &SearchParameters) -> Result<SearchPage, CatalogError> {
        CatalogSearchService::search(self, params).await
    }

    async fn bulk_upsert(
        &self,
        records: Vec<ProductRecord>,
    ) -> Result<OperationReport, CatalogError> {
        CatalogSearchService::bulk_upsert(self, records).await
    }
}

//! Dependency initialization and wiring for the catalog search service.

use std::env;
use std::sync::Arc;
use tracing::info;

use crate::service::CatalogSearchService;
use crate::CatalogError;
use catalog_search_ingest::IngestConfig;
use catalog_search_repository::opensearch::index_config::DEFAULT_INDEX;
use catalog_search_repository::{OpenSearchBackend, QueryConfig, SearchIndexBackend};

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured service ready to answer queries and ingest records.
    pub service: CatalogSearchService,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `CATALOG_INDEX`: target index name (default: products)
    /// - `INGEST_BATCH_SIZE`: records per bulk call (default: 1000)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(CatalogError)` - If initialization fails
    pub async fn new() -> Result<Self, CatalogError> {
        dotenv::dotenv().ok();

        let opensearch_url =
            env::var("OPENSEARCH_URL").unwrap_or_else(|_| DEFAULT_OPENSEARCH_URL.to_string());
        let index = env::var("CATALOG_INDEX").unwrap_or_else(|_| DEFAULT_INDEX.to_string());

        let mut ingest_config = IngestConfig::default();
        if let Ok(batch_size) = env::var("INGEST_BATCH_SIZE") {
            ingest_config.batch_size = batch_size
                .parse()
                .map_err(|_| CatalogError::config("INGEST_BATCH_SIZE must be a positive integer"))?;
        }
        ingest_config.validate()?;

        info!(
            opensearch_url = %opensearch_url,
            index = %index,
            batch_size = ingest_config.batch_size,
            "Initializing dependencies"
        );

        // Initialize the OpenSearch backend
        let backend = OpenSearchBackend::new(&opensearch_url, index)
            .map_err(|e| CatalogError::config(format!("Failed to create OpenSearch backend: {}", e)))?;

        // Verify OpenSearch is reachable
        let healthy = backend
            .health_check()
            .await
            .map_err(|e| CatalogError::config(format!("OpenSearch health check failed: {}", e)))?;

        if !healthy {
            return Err(CatalogError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        // Create the product index with its mappings if it is missing
        backend.ensure_index_exists().await?;

        let service = CatalogSearchService::with_config(
            Arc::new(backend),
            QueryConfig::default(),
            ingest_config,
        );

        Ok(Self { service })
    }
}

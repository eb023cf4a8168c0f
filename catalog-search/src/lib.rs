//! # Catalog Search
//!
//! Main library for the product catalog search service.
//!
//! This crate wires the query path and the bulk ingestion pipeline into one
//! service facade and provides configuration for running it against a live
//! search index.

pub mod config;
pub mod service;

pub use config::Dependencies;
pub use service::{CatalogRepository, CatalogSearchService};

use thiserror::Error;

/// Errors that can occur during service initialization or execution.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] catalog_search_repository::SearchError),

    /// Ingestion error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] catalog_search_ingest::IngestError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CatalogError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

//! OpenSearch backend implementation.

mod client;
pub mod index_config;

pub use client::OpenSearchBackend;

//! # Location Indexer Repository
//!
//! This crate provides traits and implementations for interacting with the
//! location search index. It includes definitions for errors, interfaces, the
//! language-to-index configuration, and a concrete implementation for OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;
pub mod utils;

pub use config::IndexOptions;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::OpenSearchProvider;
pub use types::{BatchOperationResult, BatchOperationSummary, BulkAction};

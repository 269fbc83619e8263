//! # Location Indexer
//!
//! Rebuilds the travel location search index from the mapper and serves search
//! queries against it.
//!
//! ## Architecture
//!
//! A re-upload follows the Source-Processor-Loader pattern:
//!
//! 1. **Source**: Pulls pages of locations from the mapper
//! 2. **Processor**: Builds search documents with completion phrases and display text
//! 3. **Loader**: Writes documents into OpenSearch with bulk requests
//! 4. **Orchestrator**: Recreates the index and drives the pages of every location type
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`source`]: Mapper client and page iterator
//! - [`processor`]: Transforms locations into documents
//! - [`loader`]: Writes documents into the index
//! - [`orchestrator`]: Coordinates a re-upload
//! - [`search`]: Search, suggest and get-by-id
//! - [`server`]: HTTP routes
//! - [`errors`]: Error types for the indexer

pub mod config;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod search;
pub mod server;
pub mod source;

pub use config::{AppConfig, Dependencies};
pub use errors::{LoaderError, QueryError, ReuploadError, SourceError};

use thiserror::Error;

/// Errors that can occur during service initialization or while serving.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The HTTP listener failed.
    #[error("Server error: {0}")]
    ServerError(#[from] std::io::Error),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

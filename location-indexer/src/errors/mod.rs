//! Error types for the location indexer.

use thiserror::Error;

use location_indexer_repository::SearchIndexError;

/// Errors returned by the mapper when fetching a page of locations.
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    /// The request could not be sent or the connection failed.
    #[error("Mapper request failed: {0}")]
    Request(String),

    /// The mapper answered with a non-success status.
    #[error("Mapper returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a list of locations.
    #[error("Failed to decode mapper response: {0}")]
    Decode(String),
}

impl SourceError {
    /// Create a request error.
    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

/// A write against the search index did not execute.
#[derive(Error, Debug, Clone)]
#[error("Loader error: {0}")]
pub struct LoaderError(pub String);

impl LoaderError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<SearchIndexError> for LoaderError {
    fn from(err: SearchIndexError) -> Self {
        Self(err.to_string())
    }
}

/// Errors that end a re-upload run.
#[derive(Error, Debug)]
pub enum ReuploadError {
    /// The requested language has no configured index.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A page could not be fetched from the mapper.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Deleting or creating the target index could not reach the backend.
    #[error("Index recreation failed: {0}")]
    IndexRecreation(SearchIndexError),

    /// The backend refused to delete or create the target index.
    #[error("Index recreation was rejected: {0}")]
    IndexRejected(SearchIndexError),

    /// A bulk write did not execute.
    #[error("Write error: {0}")]
    Write(#[from] LoaderError),

    /// The run was cancelled between pages.
    #[error("Re-upload was cancelled")]
    Cancelled,
}

impl ReuploadError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// True for failures that are not returned as client errors.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::IndexRecreation(_))
    }
}

/// Errors from the search read path.
#[derive(Error, Debug)]
pub enum QueryError {
    /// No document with the requested id.
    #[error("Location '{0}' was not found")]
    NotFound(String),

    /// Query parameters were rejected.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The requested language has no configured index.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The search backend failed.
    #[error("Search backend error: {0}")]
    Backend(#[from] SearchIndexError),
}

impl QueryError {
    /// Create an invalid request error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}

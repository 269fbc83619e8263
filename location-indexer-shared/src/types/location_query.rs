//! Query types for the location read path.
//!
//! This module defines the query structures used to search the index.

use serde::{Deserialize, Serialize};

/// Maximum page size accepted by the read path.
pub const MAX_TOP: usize = 100;

/// Page size used when a request does not set one.
pub const DEFAULT_TOP: usize = 10;

/// Search query parameters.
///
/// This struct represents a text search against the location index, paged with
/// `skip`/`top`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationQuery {
    /// The text typed by the user.
    pub query: String,

    /// Number of matches to skip.
    /// Default is 0.
    #[serde(default)]
    pub skip: usize,

    /// Maximum number of matches to return.
    /// Default is 10, maximum is 100.
    #[serde(default = "default_top")]
    pub top: usize,

    /// Language code used to pick the index. Falls back to the service default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

fn default_top() -> usize {
    DEFAULT_TOP
}

impl LocationQuery {
    /// Create a query for the first page of results.
    ///
    /// # Example
    ///
    /// ```
    /// use location_indexer_shared::LocationQuery;
    ///
    /// let query = LocationQuery::new("dub").with_top(20).with_skip(20);
    /// assert_eq!(query.top, 20);
    /// ```
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            skip: 0,
            top: default_top(),
            language: None,
        }
    }

    /// Set the page size.
    pub fn with_top(mut self, top: usize) -> Self {
        self.top = top.min(MAX_TOP);
        self
    }

    /// Set the offset for pagination.
    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Set the language used to resolve the index.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Validate the query parameters.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.query.trim().is_empty() {
            return Err("Query string cannot be empty".to_string());
        }

        if self.top == 0 {
            return Err("top must be greater than 0".to_string());
        }

        if self.top > MAX_TOP {
            return Err(format!("top cannot exceed {}", MAX_TOP));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_query_defaults() {
        let query = LocationQuery::new("par");
        assert_eq!(query.query, "par");
        assert_eq!(query.skip, 0);
        assert_eq!(query.top, 10);
        assert!(query.language.is_none());
    }

    #[test]
    fn test_with_top_caps_at_max() {
        let query = LocationQuery::new("par").with_top(500);
        assert_eq!(query.top, MAX_TOP);
    }

    #[test]
    fn test_validation() {
        assert!(LocationQuery::new("par").validate().is_ok());
        assert!(LocationQuery::new("   ").validate().is_err());
        assert!(LocationQuery::new("par").with_top(0).validate().is_err());

        let mut query = LocationQuery::new("par");
        query.top = 101;
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let query: LocationQuery = serde_json::from_str(r#"{"query":"rom"}"#).unwrap();
        assert_eq!(query.top, 10);
        assert_eq!(query.skip, 0);
    }
}

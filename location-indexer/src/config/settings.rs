//! Environment configuration for the location indexer.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::warn;

use crate::IndexingError;
use location_indexer_repository::IndexOptions;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default language → index mapping.
const DEFAULT_LOCATION_INDEXES: &str = r#"{"en":"locations-en"}"#;

/// Default language of the re-upload.
const DEFAULT_REUPLOAD_LANGUAGE: &str = "en";

/// Default HTTP bind address.
const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection at the configured interval until successful.
    Retry,
}

impl ConnectionMode {
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Defaults to "retry" if not set or invalid.
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "retry".to_string())
            .to_lowercase()
            .as_str()
        {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Settings read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub opensearch_url: String,
    pub indexes: IndexOptions,
    pub reupload_language: String,
    pub mapper_url: String,
    pub mapper_access_token: Option<String>,
    pub management_token: Option<String>,
    pub server_addr: SocketAddr,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
}

impl AppConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `LOCATION_INDEXES`: JSON object of language code → index name (default: `{"en":"locations-en"}`)
    /// - `REUPLOAD_LANGUAGE`: Language rebuilt by the re-upload (default: en)
    /// - `MAPPER_URL`: Mapper base URL (required)
    /// - `MAPPER_ACCESS_TOKEN`: Bearer token for the mapper (optional)
    /// - `MANAGEMENT_API_TOKEN`: Bearer token accepted by the re-upload route (optional)
    /// - `SERVER_ADDR`: HTTP bind address (default: 0.0.0.0:8080)
    /// - `OPENSEARCH_CONNECTION_MODE`: Connection mode - "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, IndexingError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let indexes_json =
            non_empty("LOCATION_INDEXES").unwrap_or_else(|| DEFAULT_LOCATION_INDEXES.to_string());
        let indexes: IndexOptions = serde_json::from_str(&indexes_json).map_err(|e| {
            IndexingError::config(format!("LOCATION_INDEXES is not a JSON object: {}", e))
        })?;
        if indexes.is_empty() {
            return Err(IndexingError::config("LOCATION_INDEXES has no entries"));
        }

        let mapper_url = non_empty("MAPPER_URL")
            .ok_or_else(|| IndexingError::config("MAPPER_URL must be set"))?;

        let server_addr = non_empty("SERVER_ADDR")
            .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let server_addr = server_addr.parse::<SocketAddr>().map_err(|e| {
            IndexingError::config(format!("Invalid SERVER_ADDR '{}': {}", server_addr, e))
        })?;

        let retry_interval = non_empty("OPENSEARCH_RETRY_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS);

        Ok(Self {
            opensearch_url: non_empty("OPENSEARCH_URL")
                .unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string()),
            indexes,
            reupload_language: non_empty("REUPLOAD_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_REUPLOAD_LANGUAGE.to_string()),
            mapper_url,
            mapper_access_token: non_empty("MAPPER_ACCESS_TOKEN"),
            management_token: non_empty("MANAGEMENT_API_TOKEN"),
            server_addr,
            connection_mode: ConnectionMode::parse(lookup("OPENSEARCH_CONNECTION_MODE")),
            retry_interval: Duration::from_secs(retry_interval),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            AppConfig::from_lookup(lookup(&[("MAPPER_URL", "http://mapper:5000")])).unwrap();

        assert_eq!(config.opensearch_url, "http://localhost:9200");
        assert_eq!(config.indexes.index_for("en"), Some("locations-en"));
        assert_eq!(config.reupload_language, "en");
        assert_eq!(config.server_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.connection_mode, ConnectionMode::Retry);
        assert_eq!(config.retry_interval, Duration::from_secs(15));
        assert!(config.management_token.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("MAPPER_URL", "http://mapper:5000"),
            ("LOCATION_INDEXES", r#"{"en":"loc-en","ru":"loc-ru"}"#),
            ("REUPLOAD_LANGUAGE", "ru"),
            ("MANAGEMENT_API_TOKEN", "secret"),
            ("OPENSEARCH_CONNECTION_MODE", "FAIL-FAST"),
            ("OPENSEARCH_RETRY_INTERVAL_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.indexes.index_for("ru"), Some("loc-ru"));
        assert_eq!(config.reupload_language, "ru");
        assert_eq!(config.management_token.as_deref(), Some("secret"));
        assert_eq!(config.connection_mode, ConnectionMode::FailFast);
        assert_eq!(config.retry_interval, Duration::from_secs(3));
    }

    #[test]
    fn test_missing_mapper_url() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("MAPPER_URL"));
    }

    #[test]
    fn test_invalid_indexes() {
        let err = AppConfig::from_lookup(lookup(&[
            ("MAPPER_URL", "http://mapper:5000"),
            ("LOCATION_INDEXES", "locations-en"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("LOCATION_INDEXES"));

        assert!(AppConfig::from_lookup(lookup(&[
            ("MAPPER_URL", "http://mapper:5000"),
            ("LOCATION_INDEXES", "{}"),
        ]))
        .is_err());
    }

    #[test]
    fn test_invalid_connection_mode_falls_back_to_retry() {
        assert_eq!(
            ConnectionMode::parse(Some("sometimes".to_string())),
            ConnectionMode::Retry
        );
    }
}

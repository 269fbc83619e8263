//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the location index.

use serde_json::{json, Value};

/// Shard layout used when an index is (re)created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSettings {
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            number_of_shards: 1,
            number_of_replicas: 1,
        }
    }
}

/// Get the index settings and mappings for the location index.
///
/// The configuration includes:
/// - **completion**: `suggestion.input` phrases for autocomplete
/// - **search_as_you_type**: `predictionText` for free-text prefix search
/// - **geo_point**: `coordinates`
/// - **Keyword fields**: For filtering and exact id lookups
///
/// # Arguments
///
/// * `settings` - Shard and replica counts
pub fn get_index_settings(settings: IndexSettings) -> Value {
    json!({
        "settings": {
            "number_of_shards": settings.number_of_shards,
            "number_of_replicas": settings.number_of_replicas
        },
        "mappings": {
            "properties": {
                "id": {
                    "type": "keyword"
                },
                "name": {
                    "type": "text",
                    "fields": {
                        "raw": {
                            "type": "keyword"
                        }
                    }
                },
                "locality": {
                    "type": "text",
                    "fields": {
                        "raw": {
                            "type": "keyword"
                        }
                    }
                },
                "country": {
                    "type": "text",
                    "fields": {
                        "raw": {
                            "type": "keyword"
                        }
                    }
                },
                "countryCode": {
                    "type": "keyword"
                },
                "suggestion": {
                    "type": "completion",
                    "analyzer": "simple",
                    "preserve_separators": true,
                    "preserve_position_increments": true,
                    "max_input_length": 100
                },
                "predictionText": {
                    "type": "search_as_you_type"
                },
                "coordinates": {
                    "type": "geo_point"
                },
                "distanceInMeters": {
                    "type": "double"
                },
                "locationType": {
                    "type": "keyword"
                },
                "type": {
                    "type": "keyword"
                },
                "modified": {
                    "type": "date"
                }
            }
        }
    })
}

//! Search document types for the location index.
//!
//! This module defines the document structure that is indexed in the search engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::location::Coordinates;

/// Completion-suggester input for a document.
///
/// Order of the phrases does not matter to the engine and duplicates are allowed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    pub input: Vec<String>,
}

impl Suggestion {
    pub fn new(input: Vec<String>) -> Self {
        Self { input }
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn len(&self) -> usize {
        self.input.len()
    }
}

/// Geo-point shape understood by the engine's `geo_point` mapping.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl From<Coordinates> for GeoPoint {
    fn from(coordinates: Coordinates) -> Self {
        Self {
            lat: coordinates.latitude,
            lon: coordinates.longitude,
        }
    }
}

/// Document representation for the location index.
///
/// This struct represents a location as it is stored in the search engine. The document
/// id is the location's `HtId`, so re-indexing a location overwrites the previous copy.
///
/// # Fields
///
/// - `id`: The location's `HtId`
/// - `suggestion`: Autocomplete phrases matched by the completion suggester
/// - `prediction_text`: Human-readable label shown for a match
/// - `location_type`: Lower-cased `LocationType`
/// - `kind`: Free-form sub-category (serialized as `type`)
/// - `modified`: When the document was built
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocument {
    pub id: String,
    pub name: String,
    pub locality: String,
    pub country: String,
    pub country_code: String,
    pub suggestion: Suggestion,
    pub prediction_text: String,
    pub coordinates: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_in_meters: Option<f64>,
    pub location_type: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub modified: DateTime<Utc>,
}

impl SearchDocument {
    /// The id used as the document key in the search index.
    pub fn document_id(&self) -> &str {
        &self.id
    }
}

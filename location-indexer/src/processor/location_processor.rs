//! Location processor implementation.
//!
//! Builds a `SearchDocument` from a mapper `Location`, deriving the completion phrases and
//! the display text. Building is pure apart from reading the clock for `modified`.

use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use location_indexer_shared::{GeoPoint, Location, LocationType, SearchDocument, Suggestion};

/// Processor that transforms locations into search documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationProcessor;

impl LocationProcessor {
    /// Create a new location processor.
    pub fn new() -> Self {
        Self
    }

    /// Build a document stamped with the current time.
    pub fn build(&self, location: &Location) -> SearchDocument {
        self.build_at(location, Utc::now())
    }

    /// Build a document stamped with `modified`.
    ///
    /// # Arguments
    ///
    /// * `location` - The mapper record
    /// * `modified` - Timestamp written to the document
    pub fn build_at(&self, location: &Location, modified: DateTime<Utc>) -> SearchDocument {
        SearchDocument {
            id: location.ht_id.clone(),
            name: location.name.clone(),
            locality: location.locality.clone(),
            country: location.country.clone(),
            country_code: location.country_code.clone(),
            suggestion: build_suggestion(location),
            prediction_text: build_prediction_text(location),
            coordinates: GeoPoint::from(location.coordinates),
            distance_in_meters: location.distance_in_meters,
            location_type: location.location_type.as_str().to_string(),
            kind: location.kind.clone(),
            modified,
        }
    }

    /// Build documents for a batch, preserving input order.
    #[instrument(skip(self, locations), fields(location_count = locations.len()))]
    pub fn build_batch(&self, locations: &[Location]) -> Vec<SearchDocument> {
        let documents: Vec<SearchDocument> = locations.iter().map(|l| self.build(l)).collect();
        debug!(document_count = documents.len(), "Built document batch");
        documents
    }
}

/// Completion phrases for a location.
///
/// Countries get their name, localities three orderings of locality and country, and
/// accommodations seven orderings of name, locality and country.
pub fn build_suggestion(location: &Location) -> Suggestion {
    let name = &location.name;
    let locality = &location.locality;
    let country = &location.country;

    let input = match location.location_type {
        LocationType::Country => vec![country.clone()],
        LocationType::Locality => vec![
            locality.clone(),
            format!("{} {}", country, locality),
            format!("{} {}", locality, country),
        ],
        LocationType::Accommodation => vec![
            name.clone(),
            format!("{} {} {}", name, locality, country),
            format!("{} {} {}", name, country, locality),
            format!("{} {}", locality, name),
            format!("{} {} {}", locality, country, name),
            format!("{} {}", country, name),
            format!("{} {} {}", country, locality, name),
        ],
        LocationType::Unknown => {
            warn!(
                ht_id = %location.ht_id,
                "Location has an unknown type, no suggestion phrases built"
            );
            Vec::new()
        }
    };

    Suggestion::new(input)
}

/// Display text: `Name, Locality, Country` for accommodations, `Locality, Country`
/// otherwise. Empty parts are dropped together with their separator.
pub fn build_prediction_text(location: &Location) -> String {
    let mut text = if location.location_type == LocationType::Accommodation {
        location.name.clone()
    } else {
        String::new()
    };

    for part in [&location.locality, &location.country] {
        if part.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push_str(", ");
        }
        text.push_str(part);
    }

    text
}

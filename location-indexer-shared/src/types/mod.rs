//! This module defines the core data structures and types used across the location indexer.
//! It re-exports specific types like `Location` and `SearchDocument`.

pub mod location;
pub mod location_query;
pub mod search_document;

pub use location::{Coordinates, Location, LocationType};
pub use location_query::LocationQuery;
pub use search_document::{GeoPoint, SearchDocument, Suggestion};

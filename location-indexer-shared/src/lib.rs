//! # Location Indexer Shared
//!
//! This crate defines shared data structures and types used across the location indexer.
//! It includes the source `Location` record fetched from the mapper, the `SearchDocument`
//! stored in the search index, and the query parameters of the read path.

pub mod types;

pub use types::location::{Coordinates, Location, LocationType};
pub use types::location_query::{LocationQuery, DEFAULT_TOP, MAX_TOP};
pub use types::search_document::{GeoPoint, SearchDocument, Suggestion};

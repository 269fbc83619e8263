//! Processor module for the location indexer.
//!
//! Turns mapper locations into search documents.

mod location_processor;

pub use location_processor::{build_prediction_text, build_suggestion, LocationProcessor};

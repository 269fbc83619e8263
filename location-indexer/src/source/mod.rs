//! Source module for the location indexer.
//!
//! Fetches locations from the mapper one page at a time.
//!
//! - [`LocationSource`]: one page per call, implemented by [`MapperClient`] and by test mocks
//! - [`LocationPages`]: pull iterator over the pages of one location type

mod mapper_client;
mod pages;

pub use mapper_client::MapperClient;
pub use pages::LocationPages;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::SourceError;
use location_indexer_shared::{Location, LocationType};

/// Page size used when streaming locations from the mapper.
pub const MAPPER_PAGE_SIZE: usize = 10_000;

/// Upstream provider of location records.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Fetch one page of locations.
    ///
    /// # Arguments
    ///
    /// * `location_type` - Only locations of this type are returned
    /// * `language_code` - Language of the localized names
    /// * `modified_since` - Only locations changed after this instant, `None` for all
    /// * `skip` - Offset of the first record
    /// * `top` - Maximum number of records
    async fn get_locations(
        &self,
        location_type: LocationType,
        language_code: &str,
        modified_since: Option<DateTime<Utc>>,
        skip: usize,
        top: usize,
    ) -> Result<Vec<Location>, SourceError>;
}

//! Pull iterator over the pages of one location type.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::LocationSource;
use crate::errors::SourceError;
use location_indexer_shared::{Location, LocationType};

/// Lazily fetches pages of `page_size` locations, stepping `skip` by `page_size` from 0.
///
/// The sequence ends after a page shorter than `page_size` (an empty page included), after
/// an error has been yielded, or once the token is cancelled. A page of exactly
/// `page_size` records always triggers another fetch. A finished sequence keeps
/// returning `None`.
pub struct LocationPages<'a> {
    source: &'a dyn LocationSource,
    token: &'a CancellationToken,
    location_type: LocationType,
    language_code: &'a str,
    page_size: usize,
    skip: usize,
    finished: bool,
}

impl<'a> LocationPages<'a> {
    pub fn new(
        source: &'a dyn LocationSource,
        token: &'a CancellationToken,
        location_type: LocationType,
        language_code: &'a str,
        page_size: usize,
    ) -> Self {
        Self {
            source,
            token,
            location_type,
            language_code,
            page_size,
            skip: 0,
            finished: false,
        }
    }

    /// Fetch the next page.
    ///
    /// # Returns
    ///
    /// * `Some(Ok(locations))` - The next page
    /// * `Some(Err(SourceError))` - The request failed; the sequence is finished
    /// * `None` - No more pages, or the token was cancelled
    pub async fn next_page(&mut self) -> Option<Result<Vec<Location>, SourceError>> {
        if self.finished {
            return None;
        }
        if self.token.is_cancelled() {
            self.finished = true;
            return None;
        }

        let request = self.source.get_locations(
            self.location_type,
            self.language_code,
            None,
            self.skip,
            self.page_size,
        );

        let result = tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                debug!(location_type = %self.location_type, skip = self.skip, "Page request cancelled");
                self.finished = true;
                return None;
            }
            result = request => result,
        };

        match result {
            Ok(locations) => {
                if locations.len() < self.page_size {
                    self.finished = true;
                }
                self.skip += self.page_size;
                Some(Ok(locations))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }

    /// Offset of the next page to fetch.
    pub fn skip(&self) -> usize {
        self.skip
    }
}

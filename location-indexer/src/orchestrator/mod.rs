//! Orchestrator module for the location indexer.
//!
//! Drives a full re-upload: recreate the target index, then stream every location type
//! from the mapper into it page by page.

use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::errors::ReuploadError;
use crate::loader::LocationLoader;
use crate::source::{LocationPages, LocationSource, MAPPER_PAGE_SIZE};
use location_indexer_repository::{IndexOptions, SearchIndexProvider};
use location_indexer_shared::LocationType;

/// Configuration for a re-upload run.
#[derive(Debug, Clone)]
pub struct ReuploadConfig {
    /// Language whose index is rebuilt and whose names are requested from the mapper.
    pub language_code: String,
    /// Number of locations requested per page.
    pub page_size: usize,
}

impl Default for ReuploadConfig {
    fn default() -> Self {
        Self {
            language_code: "en".to_string(),
            page_size: MAPPER_PAGE_SIZE,
        }
    }
}

/// Orchestrator that rebuilds a location index from the mapper.
///
/// A run is sequential and fail-fast: the first fetch or write error ends it and no
/// partial count is returned. Documents written before the error stay in the index.
/// Cancellation aborts an in-flight page request or bulk write.
pub struct ReuploadOrchestrator {
    source: Arc<dyn LocationSource>,
    provider: Arc<dyn SearchIndexProvider>,
    loader: LocationLoader,
    indexes: IndexOptions,
    config: ReuploadConfig,
}

impl ReuploadOrchestrator {
    /// Create a new orchestrator with the default configuration.
    pub fn new(
        source: Arc<dyn LocationSource>,
        provider: Arc<dyn SearchIndexProvider>,
        indexes: IndexOptions,
    ) -> Self {
        Self::with_config(source, provider, indexes, ReuploadConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        source: Arc<dyn LocationSource>,
        provider: Arc<dyn SearchIndexProvider>,
        indexes: IndexOptions,
        config: ReuploadConfig,
    ) -> Self {
        let loader = LocationLoader::new(provider.clone());
        Self {
            source,
            provider,
            loader,
            indexes,
            config,
        }
    }

    pub fn config(&self) -> &ReuploadConfig {
        &self.config
    }

    /// Run a full re-upload.
    ///
    /// # Arguments
    ///
    /// * `token` - Checked before every page request
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of locations written
    /// * `Err(ReuploadError)` - The first failure; the run stops there
    #[instrument(skip(self, token), fields(language = %self.config.language_code))]
    pub async fn reupload(&self, token: &CancellationToken) -> Result<usize, ReuploadError> {
        let started = Instant::now();
        info!("Start locations upload");

        let language_code = self.config.language_code.as_str();
        let index = self.indexes.index_for(language_code).ok_or_else(|| {
            ReuploadError::configuration(format!(
                "No index is configured for language '{}'",
                language_code
            ))
        })?;

        info!(index = %index, "Remove all locations from the index");
        self.provider
            .recreate_index(index)
            .await
            .map_err(|e| {
                error!(index = %index, error = %e, "Failed to recreate the index");
                if e.is_rejection() {
                    ReuploadError::IndexRejected(e)
                } else {
                    ReuploadError::IndexRecreation(e)
                }
            })?;

        let mut uploaded = 0;
        for location_type in LocationType::ALL {
            info!(location_type = %location_type, "Start uploading locations");
            uploaded += self
                .upload_location_type(location_type, language_code, index, token)
                .await?;
        }

        info!(
            index = %index,
            total = uploaded,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Uploading to the index has been completed"
        );
        Ok(uploaded)
    }

    async fn upload_location_type(
        &self,
        location_type: LocationType,
        language_code: &str,
        index: &str,
        token: &CancellationToken,
    ) -> Result<usize, ReuploadError> {
        let mut pages = LocationPages::new(
            self.source.as_ref(),
            token,
            location_type,
            language_code,
            self.config.page_size,
        );

        let mut uploaded = 0;
        while let Some(page) = pages.next_page().await {
            let locations = page.map_err(|e| {
                error!(location_type = %location_type, error = %e, "Failed to get locations from the mapper");
                ReuploadError::Source(e)
            })?;

            info!(
                location_type = %location_type,
                count = locations.len(),
                "Locations received from the mapper"
            );
            if locations.is_empty() {
                continue;
            }

            tokio::select! {
                biased;
                written = self.loader.add(&locations, index) => written?,
                _ = token.cancelled() => {
                    info!(location_type = %location_type, uploaded = uploaded, "Bulk write aborted by cancellation");
                    return Err(ReuploadError::Cancelled);
                }
            }
            uploaded += locations.len();
            debug!(location_type = %location_type, uploaded = uploaded, "Page written");
        }

        if token.is_cancelled() {
            info!(location_type = %location_type, uploaded = uploaded, "Locations upload cancelled");
            return Err(ReuploadError::Cancelled);
        }

        Ok(uploaded)
    }
}

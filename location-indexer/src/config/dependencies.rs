//! Dependency initialization and wiring for the location indexer.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::settings::{AppConfig, ConnectionMode};
use crate::orchestrator::{ReuploadConfig, ReuploadOrchestrator};
use crate::search::LocationsService;
use crate::server::state::AppState;
use crate::source::{MapperClient, MAPPER_PAGE_SIZE};
use crate::IndexingError;
use location_indexer_repository::opensearch::IndexSettings;
use location_indexer_repository::{OpenSearchProvider, SearchIndexProvider};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Shared state handed to the HTTP router.
    pub state: AppState,
}

impl Dependencies {
    /// Initialize all dependencies from the configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Settings read from the environment
    /// * `shutdown` - Token cancelled when the process stops
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If initialization fails (only in fail-fast mode for OpenSearch)
    pub async fn new(
        config: &AppConfig,
        shutdown: CancellationToken,
    ) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %config.opensearch_url,
            mapper_url = %config.mapper_url,
            languages = ?config.indexes.languages(),
            reupload_language = %config.reupload_language,
            connection_mode = ?config.connection_mode,
            retry_interval_secs = config.retry_interval.as_secs(),
            "Initializing dependencies"
        );

        let provider = Self::connect_to_opensearch(
            &config.opensearch_url,
            config.connection_mode,
            config.retry_interval,
            &shutdown,
        )
        .await?;
        let provider: Arc<dyn SearchIndexProvider> = Arc::new(provider);

        info!("OpenSearch connection established");

        let source = MapperClient::new(&config.mapper_url, config.mapper_access_token.clone())
            .map_err(|e| IndexingError::config(format!("Failed to create mapper client: {}", e)))?;

        let orchestrator = ReuploadOrchestrator::with_config(
            Arc::new(source),
            provider.clone(),
            config.indexes.clone(),
            ReuploadConfig {
                language_code: config.reupload_language.clone(),
                page_size: MAPPER_PAGE_SIZE,
            },
        );

        let locations = LocationsService::new(
            provider,
            config.indexes.clone(),
            config.reupload_language.clone(),
        );

        if config.management_token.is_none() {
            warn!("MANAGEMENT_API_TOKEN is not set, the re-upload route is disabled");
        }

        Ok(Self {
            state: AppState {
                orchestrator: Arc::new(orchestrator),
                locations,
                management_token: config.management_token.as_deref().map(Arc::from),
                shutdown,
            },
        })
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    async fn connect_to_opensearch(
        url: &str,
        mode: ConnectionMode,
        retry_interval: Duration,
        shutdown: &CancellationToken,
    ) -> Result<OpenSearchProvider, IndexingError> {
        loop {
            match OpenSearchProvider::new(url, IndexSettings::default()).await {
                Ok(provider) => return Ok(provider),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(IndexingError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            opensearch_url = %url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        tokio::select! {
                            _ = shutdown.cancelled() => {
                                return Err(IndexingError::config(
                                    "Shutdown requested before OpenSearch was reachable",
                                ));
                            }
                            _ = sleep(retry_interval) => {}
                        }
                    }
                },
            }
        }
    }
}

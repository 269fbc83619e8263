// App state for the Axum server
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::orchestrator::ReuploadOrchestrator;
use crate::search::LocationsService;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ReuploadOrchestrator>,
    pub locations: LocationsService,
    /// Bearer token accepted by the management routes. `None` closes them.
    pub management_token: Option<Arc<str>>,
    /// Cancelled on shutdown; re-upload runs use a child token.
    pub shutdown: CancellationToken,
}

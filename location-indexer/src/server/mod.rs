// Server module - HTTP server setup and routing
pub mod handlers;
pub mod middleware;
pub mod problem;
pub mod state;

use axum::{
    http::{header, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use self::middleware::{log_request, require_management_token};
use self::state::AppState;
use crate::IndexingError;

/// Create CORS layer for the public read routes
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Create the Axum application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let reupload = post(handlers::reupload)
        .route_layer(from_fn_with_state(state.clone(), require_management_token));

    Router::new()
        .route("/api/:version/locations", get(handlers::search_locations))
        .route(
            "/api/:version/locations/suggestions",
            get(handlers::suggest_locations),
        )
        .route("/api/:version/locations/re-upload", reupload)
        .route("/api/:version/locations/:ht_id", get(handlers::get_location))
        .layer(from_fn(log_request))
        .layer(create_cors_layer())
        .with_state(state)
}

/// Run the server on the specified address until `shutdown` is cancelled
pub async fn run_server(
    app: Router,
    addr: SocketAddr,
    shutdown: CancellationToken,
) -> Result<(), IndexingError> {
    info!("Server listening on {}", addr);
    info!("- Search endpoint: http://{}/api/1.0/locations", addr);
    info!("- Re-upload endpoint: http://{}/api/1.0/locations/re-upload", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}

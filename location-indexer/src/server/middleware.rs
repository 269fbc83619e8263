//! Middleware for the location API
//!
//! Request logging with duration tracking, and the bearer-token check guarding the
//! management routes.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::{error, info, warn};

use super::problem::ProblemDetails;
use super::state::AppState;

/// Request logging middleware
///
/// Logs all incoming requests with method, URI, status code, and
/// duration. Successful requests are logged at INFO level, failed
/// requests at ERROR level.
pub async fn log_request(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status();

    if status.is_success() {
        info!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            duration_ms = %duration_ms,
            "Request completed"
        );
    } else {
        error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            duration_ms = %duration_ms,
            "Request failed"
        );
    }

    response
}

/// Rejects requests without `Authorization: Bearer <management token>`.
///
/// Missing or malformed header: 401. Wrong token, or no token configured: 403.
pub async fn require_management_token(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    let Some(provided) = provided else {
        return ProblemDetails::new(StatusCode::UNAUTHORIZED, "A bearer token is required")
            .into_response();
    };

    match state.management_token.as_deref() {
        Some(expected) if expected == provided => next.run(request).await,
        Some(_) => {
            warn!(uri = %request.uri(), "Rejected management request with an invalid token");
            ProblemDetails::new(StatusCode::FORBIDDEN, "The token is not allowed to manage locations")
                .into_response()
        }
        None => {
            warn!(uri = %request.uri(), "Management routes are disabled, no token is configured");
            ProblemDetails::new(StatusCode::FORBIDDEN, "Location management is disabled")
                .into_response()
        }
    }
}

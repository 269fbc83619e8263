// HTTP request handlers
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{error, info};

use super::problem::ProblemDetails;
use super::state::AppState;
use location_indexer_shared::{LocationQuery, SearchDocument, DEFAULT_TOP};

/// API versions served under `/api/{version}`.
pub const SUPPORTED_VERSIONS: [&str; 2] = ["1.0", "1"];

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    pub skip: Option<usize>,
    pub top: Option<usize>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub prefix: String,
    pub top: Option<usize>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageParams {
    pub language: Option<String>,
}

fn check_version(version: &str) -> Result<(), ProblemDetails> {
    let version = version.strip_prefix('v').unwrap_or(version);
    if SUPPORTED_VERSIONS.contains(&version) {
        Ok(())
    } else {
        Err(ProblemDetails::bad_request(format!(
            "Unsupported API version '{}'",
            version
        )))
    }
}

fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ProblemDetails> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| ProblemDetails::bad_request(rejection.body_text()))
}

/// Rebuild the location index from the mapper.
pub async fn reupload(
    State(state): State<AppState>,
    Path(version): Path<String>,
) -> Result<String, ProblemDetails> {
    check_version(&version)?;

    let token = state.shutdown.child_token();
    match state.orchestrator.reupload(&token).await {
        Ok(uploaded) => {
            info!(uploaded = uploaded, "Re-upload finished");
            Ok(format!("Locations uploaded '{}'", uploaded))
        }
        Err(e) => {
            error!(error = %e, fatal = e.is_fatal(), "Re-upload failed");
            Err(e.into())
        }
    }
}

/// Free-text search over prediction texts.
pub async fn search_locations(
    State(state): State<AppState>,
    Path(version): Path<String>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<SearchDocument>>, ProblemDetails> {
    check_version(&version)?;
    let params = query_params(params)?;

    let mut query = LocationQuery::new(params.query).with_skip(params.skip.unwrap_or(0));
    if let Some(top) = params.top {
        query.top = top;
    }
    query.language = params.language;

    Ok(Json(state.locations.search(&query).await?))
}

/// Completion suggestions for a prefix.
pub async fn suggest_locations(
    State(state): State<AppState>,
    Path(version): Path<String>,
    params: Result<Query<SuggestParams>, QueryRejection>,
) -> Result<Json<Vec<SearchDocument>>, ProblemDetails> {
    check_version(&version)?;
    let params = query_params(params)?;

    let top = params.top.unwrap_or(DEFAULT_TOP);
    let documents = state
        .locations
        .suggest(&params.prefix, top, params.language.as_deref())
        .await?;
    Ok(Json(documents))
}

/// A single location by HtId.
pub async fn get_location(
    State(state): State<AppState>,
    Path((version, ht_id)): Path<(String, String)>,
    params: Result<Query<LanguageParams>, QueryRejection>,
) -> Result<Json<SearchDocument>, ProblemDetails> {
    check_version(&version)?;
    let params = query_params(params)?;

    let document = state
        .locations
        .get(&ht_id, params.language.as_deref())
        .await?;
    Ok(Json(document))
}

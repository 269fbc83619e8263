//! Utility functions for the location indexer repository.
//!
//! Helpers that build bulk request bodies and read the engine's JSON responses. They are
//! kept free of any client so they can be unit tested against recorded payloads.

use location_indexer_shared::SearchDocument;
use serde_json::{json, Value};

use crate::errors::SearchIndexError;
use crate::types::{BatchOperationResult, BatchOperationSummary, BulkAction};

/// Validate a document id before it is used in a request path or bulk action line.
///
/// # Arguments
///
/// * `document_id` - The id to check
///
/// # Returns
///
/// * `Ok(())` - If the id is usable
/// * `Err(SearchIndexError)` - If the id is empty or blank
pub fn validate_document_id(document_id: &str) -> Result<(), SearchIndexError> {
    if document_id.trim().is_empty() {
        return Err(SearchIndexError::validation(
            "Document id cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Build the NDJSON lines of a bulk request that indexes whole documents.
///
/// Each document yields an action line keyed by its id followed by the document source.
pub fn bulk_index_lines(documents: &[SearchDocument]) -> Result<Vec<Value>, SearchIndexError> {
    let mut lines = Vec::with_capacity(documents.len() * 2);
    for document in documents {
        validate_document_id(document.document_id())?;
        let source = serde_json::to_value(document)
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;
        lines.push(json!({ "index": { "_id": document.document_id() } }));
        lines.push(source);
    }
    Ok(lines)
}

/// Build the NDJSON lines of a bulk request that merges documents into existing ones.
pub fn bulk_update_lines(documents: &[SearchDocument]) -> Result<Vec<Value>, SearchIndexError> {
    let mut lines = Vec::with_capacity(documents.len() * 2);
    for document in documents {
        validate_document_id(document.document_id())?;
        let source = serde_json::to_value(document)
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;
        lines.push(json!({ "update": { "_id": document.document_id() } }));
        lines.push(json!({ "doc": source }));
    }
    Ok(lines)
}

/// Build the NDJSON lines of a bulk request that deletes documents by id.
pub fn bulk_delete_lines(document_ids: &[String]) -> Result<Vec<Value>, SearchIndexError> {
    document_ids
        .iter()
        .map(|id| {
            validate_document_id(id)?;
            Ok(json!({ "delete": { "_id": id } }))
        })
        .collect()
}

/// Read the per-item outcome of an executed bulk request.
///
/// A missing document on delete (status 404 without an `error` object) counts as success.
///
/// # Arguments
///
/// * `action` - The action every item in the request carried
/// * `body` - The parsed `_bulk` response body
///
/// # Returns
///
/// * `Ok(BatchOperationSummary)` - One result per response item
/// * `Err(SearchIndexError)` - If the body has no `items` array
pub fn parse_bulk_response(
    action: BulkAction,
    body: &Value,
) -> Result<BatchOperationSummary, SearchIndexError> {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchIndexError::parse("Bulk response has no items array"))?;

    let results = items
        .iter()
        .map(|item| {
            let entry = item
                .get(action.as_str())
                .or_else(|| item.as_object().and_then(|o| o.values().next()))
                .unwrap_or(&Value::Null);

            let document_id = entry
                .get("_id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            match entry.get("error") {
                Some(error) => BatchOperationResult {
                    document_id,
                    success: false,
                    error: Some(item_error(action, error)),
                },
                None => {
                    let status = entry.get("status").and_then(Value::as_u64).unwrap_or(200);
                    let success =
                        (200..300).contains(&status) || (action == BulkAction::Delete && status == 404);
                    BatchOperationResult {
                        document_id,
                        success,
                        error: (!success).then(|| {
                            item_error(action, &json!({ "type": "status", "reason": status }))
                        }),
                    }
                }
            }
        })
        .collect();

    Ok(BatchOperationSummary::from_results(results))
}

fn item_error(action: BulkAction, error: &Value) -> SearchIndexError {
    let kind = error
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let reason = match error.get("reason") {
        Some(Value::String(reason)) => reason.clone(),
        Some(other) => other.to_string(),
        None => error.to_string(),
    };
    let message = format!("{}: {}", kind, reason);
    match action {
        BulkAction::Index => SearchIndexError::index(message),
        BulkAction::Update => SearchIndexError::update(message),
        BulkAction::Delete => SearchIndexError::delete(message),
    }
}

/// Extract the `_source` of every hit in a search response.
pub fn parse_search_hits(body: &Value) -> Result<Vec<SearchDocument>, SearchIndexError> {
    let hits = body
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchIndexError::parse("Search response has no hits array"))?;

    hits.iter().map(parse_source).collect()
}

/// Extract the `_source` of every option of a named completion suggestion.
pub fn parse_suggest_options(
    body: &Value,
    suggestion_name: &str,
) -> Result<Vec<SearchDocument>, SearchIndexError> {
    let entries = body
        .get("suggest")
        .and_then(|s| s.get(suggestion_name))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            SearchIndexError::parse(format!(
                "Suggest response has no '{}' entry",
                suggestion_name
            ))
        })?;

    let mut documents = Vec::new();
    for entry in entries {
        if let Some(options) = entry.get("options").and_then(Value::as_array) {
            for option in options {
                documents.push(parse_source(option)?);
            }
        }
    }
    Ok(documents)
}

/// True when a 404 body reports a missing index rather than a missing document.
///
/// A get for an absent document answers `{"found": false}`; an absent index answers with
/// an `index_not_found_exception` error object.
pub fn is_missing_index(body: &str) -> bool {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/type")
                .and_then(Value::as_str)
                .map(|kind| kind == "index_not_found_exception")
        })
        .unwrap_or(false)
}

/// Decode the `_source` object of a hit, suggestion option or get response.
pub fn parse_source(hit: &Value) -> Result<SearchDocument, SearchIndexError> {
    let source = hit
        .get("_source")
        .ok_or_else(|| SearchIndexError::parse("Hit has no _source"))?;
    serde_json::from_value(source.clone()).map_err(|e| SearchIndexError::parse(e.to_string()))
}

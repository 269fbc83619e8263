//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use location_indexer_shared::SearchDocument;
use opensearch::{
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts},
    BulkParts, DeleteParts, GetParts, IndexParts, OpenSearch, SearchParts, UpdateParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::{get_index_settings, IndexSettings};
use crate::types::{BatchOperationSummary, BulkAction};
use crate::utils;

/// Name of the completion suggestion in suggest requests and responses.
const SUGGESTION_NAME: &str = "locations";

/// OpenSearch provider implementation.
///
/// Provides bulk indexing, index lifecycle and read access using OpenSearch as the backend.
///
/// # Example
///
/// ```ignore
/// use location_indexer_repository::opensearch::{IndexSettings, OpenSearchProvider};
///
/// let provider = OpenSearchProvider::new("http://localhost:9200", IndexSettings::default()).await?;
/// provider.recreate_index("locations-en").await?;
/// let summary = provider.bulk_index_documents("locations-en", &documents).await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    settings: IndexSettings,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `settings` - Shard layout applied when an index is (re)created
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or the cluster does not answer a ping
    pub async fn new(url: &str, settings: IndexSettings) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        let response = client
            .ping()
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;
        if !response.status_code().is_success() {
            return Err(SearchIndexError::connection(format!(
                "Ping returned status {}",
                response.status_code()
            )));
        }

        info!(
            url = %url,
            shards = settings.number_of_shards,
            replicas = settings.number_of_replicas,
            "Created OpenSearch provider"
        );

        Ok(Self { client, settings })
    }

    /// Send one `_bulk` request and read the per-item outcome.
    ///
    /// Transport failures and non-success statuses fail the whole batch. Item-level
    /// rejections are returned in the summary.
    async fn send_bulk(
        &self,
        index: &str,
        action: BulkAction,
        lines: Vec<Value>,
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        if lines.is_empty() {
            return Ok(BatchOperationSummary::empty());
        }

        let body: Vec<JsonBody<Value>> = lines.into_iter().map(JsonBody::new).collect();

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(
                index = %index,
                action = action.as_str(),
                status = %status,
                body = %error_body,
                "Bulk request failed"
            );
            return Err(SearchIndexError::bulk_index(format!(
                "Bulk {} failed with status {}: {}",
                action.as_str(),
                status,
                error_body
            )));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let summary = utils::parse_bulk_response(action, &body)?;

        debug!(
            index = %index,
            action = action.as_str(),
            total = summary.total,
            failed = summary.failed,
            "Bulk request executed"
        );
        Ok(summary)
    }

    /// Run a `_search` request against an index and return the raw body.
    async fn send_search(&self, index: &str, body: Value) -> Result<Value, SearchIndexError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::search(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(index = %index, status = %status, body = %error_body, "Search request failed");
            return Err(SearchIndexError::search(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    /// Delete the index if present, then create it from the location mappings.
    ///
    /// A missing index on delete is not an error. Transport failures come back as
    /// deletion/creation errors, non-success statuses as rejections.
    #[instrument(skip(self))]
    async fn recreate_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_deletion(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index deletion failed");
            return Err(SearchIndexError::index_rejected(format!(
                "Deleting index '{}' failed with status {}: {}",
                index, status, error_body
            )));
        }

        debug!(index = %index, existed = status.is_success(), "Index deleted");

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(get_index_settings(self.settings))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index creation failed");
            return Err(SearchIndexError::index_rejected(format!(
                "Creating index '{}' failed with status {}: {}",
                index, status, error_body
            )));
        }

        info!(index = %index, "Index recreated");
        Ok(())
    }

    async fn index_document(
        &self,
        index: &str,
        document: &SearchDocument,
    ) -> Result<(), SearchIndexError> {
        let doc_id = document.document_id();
        utils::validate_document_id(doc_id)?;

        let response = self
            .client
            .index(IndexParts::IndexId(index, doc_id))
            .body(document)
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index request failed");
            return Err(SearchIndexError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %doc_id, "Document indexed");
        Ok(())
    }

    /// Merge the document into the stored one. The stored document must exist.
    async fn update_document(
        &self,
        index: &str,
        document: &SearchDocument,
    ) -> Result<(), SearchIndexError> {
        let doc_id = document.document_id();
        utils::validate_document_id(doc_id)?;

        // API reference: https://docs.opensearch.org/latest/api-reference/document-apis/update-document/
        let response = self
            .client
            .update(UpdateParts::IndexId(index, doc_id))
            .body(json!({ "doc": document }))
            .send()
            .await
            .map_err(|e| SearchIndexError::update(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Err(SearchIndexError::document_not_found(index, doc_id));
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Update request failed");
            return Err(SearchIndexError::update(format!(
                "Update failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %doc_id, "Document updated");
        Ok(())
    }

    /// Delete a document by id. A missing document is considered deleted.
    async fn delete_document(
        &self,
        index: &str,
        document_id: &str,
    ) -> Result<(), SearchIndexError> {
        utils::validate_document_id(document_id)?;

        let response = self
            .client
            .delete(DeleteParts::IndexId(index, document_id))
            .send()
            .await
            .map_err(|e| SearchIndexError::delete(e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - document may not exist
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Delete request failed");
            return Err(SearchIndexError::delete(format!(
                "Delete failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %document_id, "Document deleted");
        Ok(())
    }

    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn bulk_index_documents(
        &self,
        index: &str,
        documents: &[SearchDocument],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let lines = utils::bulk_index_lines(documents)?;
        self.send_bulk(index, BulkAction::Index, lines).await
    }

    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn bulk_update_documents(
        &self,
        index: &str,
        documents: &[SearchDocument],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let lines = utils::bulk_update_lines(documents)?;
        self.send_bulk(index, BulkAction::Update, lines).await
    }

    #[instrument(skip(self, document_ids), fields(count = document_ids.len()))]
    async fn bulk_delete_documents(
        &self,
        index: &str,
        document_ids: &[String],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let lines = utils::bulk_delete_lines(document_ids)?;
        self.send_bulk(index, BulkAction::Delete, lines).await
    }

    async fn search(
        &self,
        index: &str,
        query: &str,
        skip: usize,
        top: usize,
    ) -> Result<Vec<SearchDocument>, SearchIndexError> {
        let body = json!({
            "from": skip,
            "size": top,
            "query": {
                "multi_match": {
                    "query": query,
                    "type": "bool_prefix",
                    "fields": [
                        "predictionText",
                        "predictionText._2gram",
                        "predictionText._3gram"
                    ]
                }
            }
        });

        let response = self.send_search(index, body).await?;
        let documents = utils::parse_search_hits(&response)?;

        debug!(index = %index, query = %query, hits = documents.len(), "Search executed");
        Ok(documents)
    }

    async fn suggest(
        &self,
        index: &str,
        prefix: &str,
        top: usize,
    ) -> Result<Vec<SearchDocument>, SearchIndexError> {
        let mut suggest = serde_json::Map::new();
        suggest.insert(
            SUGGESTION_NAME.to_string(),
            json!({
                "prefix": prefix,
                "completion": {
                    "field": "suggestion",
                    "size": top,
                    "skip_duplicates": true
                }
            }),
        );
        let body = json!({ "suggest": suggest });

        let response = self.send_search(index, body).await?;
        let documents = utils::parse_suggest_options(&response, SUGGESTION_NAME)?;

        debug!(index = %index, prefix = %prefix, options = documents.len(), "Suggest executed");
        Ok(documents)
    }

    async fn get_document(
        &self,
        index: &str,
        document_id: &str,
    ) -> Result<Option<SearchDocument>, SearchIndexError> {
        utils::validate_document_id(document_id)?;

        let response = self
            .client
            .get(GetParts::IndexId(index, document_id))
            .send()
            .await
            .map_err(|e| SearchIndexError::search(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            let error_body = response.text().await.unwrap_or_default();
            if utils::is_missing_index(&error_body) {
                error!(index = %index, body = %error_body, "Index does not exist");
                return Err(SearchIndexError::search(format!(
                    "Index '{}' does not exist",
                    index
                )));
            }
            warn!(index = %index, doc_id = %document_id, "Document not found");
            return Ok(None);
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Get request failed");
            return Err(SearchIndexError::search(format!(
                "Get failed with status {}: {}",
                status, error_body
            )));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        utils::parse_source(&body).map(Some)
    }
}

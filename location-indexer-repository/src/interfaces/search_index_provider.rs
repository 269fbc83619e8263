//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use location_indexer_shared::SearchDocument;

use crate::errors::SearchIndexError;
use crate::types::BatchOperationSummary;

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// This trait defines the interface for all search index backend implementations. Implementations
/// are injected into the loader, the reupload orchestrator and the read path to enable
/// dependency injection and easy testing with mock implementations.
///
/// Every method takes the target index name explicitly: the index is picked per language by
/// the caller, the provider itself is index-agnostic.
///
/// # Bulk Operations
///
/// The `bulk_*` methods send a single bulk request. `Err` means the request itself did not
/// execute (transport failure, rejected request). Items rejected by the engine inside an
/// executed request are reported in the returned `BatchOperationSummary`.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Delete the index if present, then create it again from the configured settings.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index exists and is empty
    /// * `Err(SearchIndexError)` - If deletion or creation fails
    async fn recreate_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Index a whole document, overwriting any document with the same id.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    /// * `document` - The document to store
    async fn index_document(
        &self,
        index: &str,
        document: &SearchDocument,
    ) -> Result<(), SearchIndexError>;

    /// Merge a document into the existing document with the same id.
    ///
    /// The document must already exist.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    /// * `document` - The partial document to merge
    async fn update_document(
        &self,
        index: &str,
        document: &SearchDocument,
    ) -> Result<(), SearchIndexError>;

    /// Delete a document from the search index.
    ///
    /// If the document doesn't exist, the operation is considered successful.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    /// * `document_id` - The id of the document to remove
    async fn delete_document(&self, index: &str, document_id: &str)
        -> Result<(), SearchIndexError>;

    /// Index multiple documents in one bulk request.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Contains aggregate statistics and individual results
    /// * `Err(SearchIndexError)` - If the bulk operation fails entirely
    async fn bulk_index_documents(
        &self,
        index: &str,
        documents: &[SearchDocument],
    ) -> Result<BatchOperationSummary, SearchIndexError>;

    /// Merge multiple documents into existing documents in one bulk request.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Contains aggregate statistics and individual results
    /// * `Err(SearchIndexError)` - If the bulk operation fails entirely
    async fn bulk_update_documents(
        &self,
        index: &str,
        documents: &[SearchDocument],
    ) -> Result<BatchOperationSummary, SearchIndexError>;

    /// Delete multiple documents by id in one bulk request.
    ///
    /// Documents that don't exist are considered successful deletions.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Contains aggregate statistics and individual results
    /// * `Err(SearchIndexError)` - If the bulk operation fails entirely
    async fn bulk_delete_documents(
        &self,
        index: &str,
        document_ids: &[String],
    ) -> Result<BatchOperationSummary, SearchIndexError>;

    /// Free-text search, paged with `skip`/`top`. Ranking belongs to the engine.
    async fn search(
        &self,
        index: &str,
        query: &str,
        skip: usize,
        top: usize,
    ) -> Result<Vec<SearchDocument>, SearchIndexError>;

    /// Completion-suggester lookup over the `suggestion` phrases.
    async fn suggest(
        &self,
        index: &str,
        prefix: &str,
        top: usize,
    ) -> Result<Vec<SearchDocument>, SearchIndexError>;

    /// Fetch a document by id.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(SearchDocument))` - If the document exists
    /// * `Ok(None)` - If the engine reports the document as missing
    /// * `Err(SearchIndexError)` - If the request fails
    async fn get_document(
        &self,
        index: &str,
        document_id: &str,
    ) -> Result<Option<SearchDocument>, SearchIndexError>;
}

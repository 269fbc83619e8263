//! Mock collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use location_indexer::errors::SourceError;
use location_indexer::source::LocationSource;
use location_indexer_repository::{
    BatchOperationResult, BatchOperationSummary, SearchIndexError, SearchIndexProvider,
};
use location_indexer_shared::{Location, LocationType, SearchDocument};

/// Serves scripted page sizes per location type. Unscripted pages are empty.
#[derive(Default)]
pub struct MockSource {
    pages: Mutex<HashMap<LocationType, Vec<Result<usize, SourceError>>>>,
    pub requests: Mutex<Vec<(LocationType, usize, usize)>>,
    cancel_after: Mutex<Option<(usize, CancellationToken)>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(
        self,
        location_type: LocationType,
        pages: Vec<Result<usize, SourceError>>,
    ) -> Self {
        self.pages.lock().unwrap().insert(location_type, pages);
        self
    }

    /// Cancel `token` once `calls` requests have been answered.
    pub fn cancel_after(self, calls: usize, token: CancellationToken) -> Self {
        *self.cancel_after.lock().unwrap() = Some((calls, token));
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requested_types(&self) -> Vec<LocationType> {
        self.requests.lock().unwrap().iter().map(|r| r.0).collect()
    }
}

#[async_trait]
impl LocationSource for MockSource {
    async fn get_locations(
        &self,
        location_type: LocationType,
        _language_code: &str,
        _modified_since: Option<DateTime<Utc>>,
        skip: usize,
        top: usize,
    ) -> Result<Vec<Location>, SourceError> {
        let calls = {
            let mut requests = self.requests.lock().unwrap();
            requests.push((location_type, skip, top));
            requests.len()
        };

        let next = {
            let mut pages = self.pages.lock().unwrap();
            match pages.get_mut(&location_type) {
                Some(script) if !script.is_empty() => script.remove(0),
                _ => Ok(0),
            }
        };

        if let Some((after, token)) = self.cancel_after.lock().unwrap().as_ref() {
            if calls >= *after {
                token.cancel();
            }
        }

        let size = next?;
        Ok((0..size)
            .map(|i| {
                Location::new(format!("{}-{}", location_type, skip + i), location_type)
                    .with_name(format!("Hotel {}", i))
                    .with_locality("Dubai")
                    .with_country("United Arab Emirates")
            })
            .collect())
    }
}

/// In-memory index. Failure switches make individual operations fail.
#[derive(Default)]
pub struct MockSearchProvider {
    pub recreated: Mutex<Vec<String>>,
    pub documents: Mutex<Vec<SearchDocument>>,
    pub bulk_calls: AtomicUsize,
    /// Fail the bulk request with this 1-based call number.
    pub fail_bulk_call: Option<usize>,
    /// Never answer the bulk request with this 1-based call number.
    pub hang_bulk_call: Option<usize>,
    pub fail_recreate: bool,
    /// Answer the index create with a non-success status.
    pub reject_recreate: bool,
    /// Ids the engine rejects inside an executed bulk request.
    pub rejected_ids: Vec<String>,
}

impl MockSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<SearchDocument>) -> Self {
        Self {
            documents: Mutex::new(documents),
            ..Default::default()
        }
    }

    pub fn document_count(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub fn bulk_call_count(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchIndexProvider for MockSearchProvider {
    async fn recreate_index(&self, index: &str) -> Result<(), SearchIndexError> {
        if self.fail_recreate {
            return Err(SearchIndexError::index_deletion("connection reset by peer"));
        }
        if self.reject_recreate {
            return Err(SearchIndexError::index_rejected(format!(
                "Creating index '{}' failed with status 400 Bad Request: resource_already_exists_exception",
                index
            )));
        }
        self.recreated.lock().unwrap().push(index.to_string());
        self.documents.lock().unwrap().clear();
        Ok(())
    }

    async fn index_document(
        &self,
        _index: &str,
        document: &SearchDocument,
    ) -> Result<(), SearchIndexError> {
        self.documents.lock().unwrap().push(document.clone());
        Ok(())
    }

    async fn update_document(
        &self,
        _index: &str,
        _document: &SearchDocument,
    ) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn delete_document(
        &self,
        _index: &str,
        document_id: &str,
    ) -> Result<(), SearchIndexError> {
        self.documents
            .lock()
            .unwrap()
            .retain(|d| d.id != document_id);
        Ok(())
    }

    async fn bulk_index_documents(
        &self,
        _index: &str,
        documents: &[SearchDocument],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let call = self.bulk_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_bulk_call == Some(call) {
            return Err(SearchIndexError::bulk_index("request timed out"));
        }
        if self.hang_bulk_call == Some(call) {
            std::future::pending::<()>().await;
        }

        let mut stored = self.documents.lock().unwrap();
        let results = documents
            .iter()
            .map(|document| {
                let rejected = self.rejected_ids.contains(&document.id);
                if !rejected {
                    stored.push(document.clone());
                }
                BatchOperationResult {
                    document_id: document.id.clone(),
                    success: !rejected,
                    error: rejected.then(|| SearchIndexError::index("mapper_parsing_exception")),
                }
            })
            .collect();
        Ok(BatchOperationSummary::from_results(results))
    }

    async fn bulk_update_documents(
        &self,
        _index: &str,
        _documents: &[SearchDocument],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        Ok(BatchOperationSummary::empty())
    }

    async fn bulk_delete_documents(
        &self,
        _index: &str,
        _document_ids: &[String],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        Ok(BatchOperationSummary::empty())
    }

    async fn search(
        &self,
        _index: &str,
        query: &str,
        skip: usize,
        top: usize,
    ) -> Result<Vec<SearchDocument>, SearchIndexError> {
        let query = query.to_lowercase();
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.prediction_text.to_lowercase().contains(&query))
            .skip(skip)
            .take(top)
            .cloned()
            .collect())
    }

    async fn suggest(
        &self,
        _index: &str,
        prefix: &str,
        top: usize,
    ) -> Result<Vec<SearchDocument>, SearchIndexError> {
        let prefix = prefix.to_lowercase();
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| {
                d.suggestion
                    .input
                    .iter()
                    .any(|phrase| phrase.to_lowercase().starts_with(&prefix))
            })
            .take(top)
            .cloned()
            .collect())
    }

    async fn get_document(
        &self,
        _index: &str,
        document_id: &str,
    ) -> Result<Option<SearchDocument>, SearchIndexError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == document_id)
            .cloned())
    }
}

//! Loader module for the location indexer.
//!
//! Writes locations into a search index as documents, in bulk or one at a time.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::LoaderError;
use crate::processor::LocationProcessor;
use location_indexer_repository::{
    BatchOperationSummary, BulkAction, SearchIndexError, SearchIndexProvider,
};
use location_indexer_shared::Location;

/// Loader that writes locations into the search engine.
///
/// Batched operations return `Ok` as soon as the bulk request executes. Items the engine
/// rejected inside an executed request are logged with their id and do not fail the call.
#[derive(Clone)]
pub struct LocationLoader {
    provider: Arc<dyn SearchIndexProvider>,
    processor: LocationProcessor,
}

impl LocationLoader {
    /// Create a new loader with the given provider.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            processor: LocationProcessor::new(),
        }
    }

    /// Index the locations, overwriting documents with the same id.
    #[instrument(skip(self, locations), fields(location_count = locations.len()))]
    pub async fn add(&self, locations: &[Location], index: &str) -> Result<(), LoaderError> {
        if locations.is_empty() {
            return Ok(());
        }

        let documents = self.processor.build_batch(locations);
        let summary = self
            .provider
            .bulk_index_documents(index, &documents)
            .await
            .map_err(|e| Self::bulk_failure(BulkAction::Index, locations.len(), index, e))?;

        info!(
            count = locations.len(),
            index = %index,
            "Locations have been added to the index"
        );
        Self::log_item_failures(BulkAction::Index, &summary);
        Ok(())
    }

    /// Merge the locations into existing documents.
    #[instrument(skip(self, locations), fields(location_count = locations.len()))]
    pub async fn update(&self, locations: &[Location], index: &str) -> Result<(), LoaderError> {
        if locations.is_empty() {
            return Ok(());
        }

        let documents = self.processor.build_batch(locations);
        let summary = self
            .provider
            .bulk_update_documents(index, &documents)
            .await
            .map_err(|e| Self::bulk_failure(BulkAction::Update, locations.len(), index, e))?;

        info!(
            count = locations.len(),
            index = %index,
            "Locations have been updated in the index"
        );
        Self::log_item_failures(BulkAction::Update, &summary);
        Ok(())
    }

    /// Delete the documents of the locations.
    #[instrument(skip(self, locations), fields(location_count = locations.len()))]
    pub async fn remove(&self, locations: &[Location], index: &str) -> Result<(), LoaderError> {
        if locations.is_empty() {
            return Ok(());
        }

        let ids: Vec<String> = locations.iter().map(|l| l.ht_id.clone()).collect();
        let summary = self
            .provider
            .bulk_delete_documents(index, &ids)
            .await
            .map_err(|e| Self::bulk_failure(BulkAction::Delete, locations.len(), index, e))?;

        info!(
            count = locations.len(),
            index = %index,
            "Locations have been removed from the index"
        );
        Self::log_item_failures(BulkAction::Delete, &summary);
        Ok(())
    }

    /// Index a single location.
    pub async fn add_one(&self, location: &Location, index: &str) -> Result<(), LoaderError> {
        let document = self.processor.build(location);
        self.provider.index_document(index, &document).await?;
        debug!(ht_id = %location.ht_id, index = %index, "Location added");
        Ok(())
    }

    /// Merge a single location into its existing document.
    pub async fn update_one(&self, location: &Location, index: &str) -> Result<(), LoaderError> {
        let document = self.processor.build(location);
        self.provider.update_document(index, &document).await?;
        debug!(ht_id = %location.ht_id, index = %index, "Location updated");
        Ok(())
    }

    /// Delete a single location's document. A missing document is not an error.
    pub async fn remove_one(&self, location: &Location, index: &str) -> Result<(), LoaderError> {
        self.provider
            .delete_document(index, &location.ht_id)
            .await?;
        debug!(ht_id = %location.ht_id, index = %index, "Location removed");
        Ok(())
    }

    fn bulk_failure(
        action: BulkAction,
        count: usize,
        index: &str,
        err: SearchIndexError,
    ) -> LoaderError {
        error!(
            action = action.as_str(),
            count = count,
            index = %index,
            error = %err,
            "Bulk request failed"
        );
        LoaderError::new(format!(
            "Failed to {} {} locations in '{}': {}",
            action.as_str(),
            count,
            index,
            err
        ))
    }

    fn log_item_failures(action: BulkAction, summary: &BatchOperationSummary) {
        if !summary.has_failures() {
            return;
        }

        warn!(
            action = action.as_str(),
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Bulk request completed with some failures"
        );
        for result in summary.failures() {
            if let Some(ref err) = result.error {
                error!(ht_id = %result.document_id, error = %err, "Failed to write location");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use location_indexer_repository::BatchOperationResult;
    use location_indexer_shared::{LocationType, SearchDocument};
    use std::sync::Mutex;

    /// Records every call; rejects ids listed in `rejected`, fails outright when `broken`.
    #[derive(Default)]
    struct MockSearchProvider {
        calls: Mutex<Vec<String>>,
        written: Mutex<Vec<String>>,
        rejected: Vec<String>,
        broken: bool,
    }

    impl MockSearchProvider {
        fn summary(&self, ids: Vec<String>) -> Result<BatchOperationSummary, SearchIndexError> {
            if self.broken {
                return Err(SearchIndexError::bulk_index("connection refused"));
            }
            let results = ids
                .into_iter()
                .map(|id| {
                    let rejected = self.rejected.contains(&id);
                    if !rejected {
                        self.written.lock().unwrap().push(id.clone());
                    }
                    BatchOperationResult {
                        document_id: id,
                        success: !rejected,
                        error: rejected.then(|| SearchIndexError::index("mapper_parsing_exception")),
                    }
                })
                .collect();
            Ok(BatchOperationSummary::from_results(results))
        }

        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockSearchProvider {
        async fn recreate_index(&self, _index: &str) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn index_document(
            &self,
            _index: &str,
            document: &SearchDocument,
        ) -> Result<(), SearchIndexError> {
            self.record("index");
            if self.broken {
                return Err(SearchIndexError::index("timeout"));
            }
            self.written.lock().unwrap().push(document.id.clone());
            Ok(())
        }

        async fn update_document(
            &self,
            _index: &str,
            _document: &SearchDocument,
        ) -> Result<(), SearchIndexError> {
            self.record("update");
            Ok(())
        }

        async fn delete_document(
            &self,
            _index: &str,
            _document_id: &str,
        ) -> Result<(), SearchIndexError> {
            self.record("delete");
            Ok(())
        }

        async fn bulk_index_documents(
            &self,
            _index: &str,
            documents: &[SearchDocument],
        ) -> Result<BatchOperationSummary, SearchIndexError> {
            self.record("bulk_index");
            self.summary(documents.iter().map(|d| d.id.clone()).collect())
        }

        async fn bulk_update_documents(
            &self,
            _index: &str,
            documents: &[SearchDocument],
        ) -> Result<BatchOperationSummary, SearchIndexError> {
            self.record("bulk_update");
            self.summary(documents.iter().map(|d| d.id.clone()).collect())
        }

        async fn bulk_delete_documents(
            &self,
            _index: &str,
            document_ids: &[String],
        ) -> Result<BatchOperationSummary, SearchIndexError> {
            self.record("bulk_delete");
            self.summary(document_ids.to_vec())
        }

        async fn search(
            &self,
            _index: &str,
            _query: &str,
            _skip: usize,
            _top: usize,
        ) -> Result<Vec<SearchDocument>, SearchIndexError> {
            Ok(Vec::new())
        }

        async fn suggest(
            &self,
            _index: &str,
            _prefix: &str,
            _top: usize,
        ) -> Result<Vec<SearchDocument>, SearchIndexError> {
            Ok(Vec::new())
        }

        async fn get_document(
            &self,
            _index: &str,
            _document_id: &str,
        ) -> Result<Option<SearchDocument>, SearchIndexError> {
            Ok(None)
        }
    }

    fn locations() -> Vec<Location> {
        vec![
            Location::new("A", LocationType::Country).with_country("France"),
            Location::new("B", LocationType::Country).with_country("Spain"),
        ]
    }

    #[tokio::test]
    async fn test_add_issues_one_bulk_request() {
        let provider = Arc::new(MockSearchProvider::default());
        let loader = LocationLoader::new(provider.clone());

        loader.add(&locations(), "locations-en").await.unwrap();

        assert_eq!(*provider.calls.lock().unwrap(), vec!["bulk_index"]);
        assert_eq!(*provider.written.lock().unwrap(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_item_failures_do_not_fail_the_batch() {
        let provider = Arc::new(MockSearchProvider {
            rejected: vec!["B".to_string()],
            ..Default::default()
        });
        let loader = LocationLoader::new(provider.clone());

        assert!(loader.add(&locations(), "locations-en").await.is_ok());
        assert_eq!(*provider.written.lock().unwrap(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_error() {
        let provider = Arc::new(MockSearchProvider {
            broken: true,
            ..Default::default()
        });
        let loader = LocationLoader::new(provider);

        let err = loader.update(&locations(), "locations-en").await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
        assert!(err.to_string().contains("update"));
    }

    #[tokio::test]
    async fn test_empty_batch_skips_backend() {
        let provider = Arc::new(MockSearchProvider::default());
        let loader = LocationLoader::new(provider.clone());

        loader.add(&[], "locations-en").await.unwrap();
        loader.update(&[], "locations-en").await.unwrap();
        loader.remove(&[], "locations-en").await.unwrap();

        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_sends_ids() {
        let provider = Arc::new(MockSearchProvider::default());
        let loader = LocationLoader::new(provider.clone());

        loader.remove(&locations(), "locations-en").await.unwrap();

        assert_eq!(*provider.calls.lock().unwrap(), vec!["bulk_delete"]);
        assert_eq!(*provider.written.lock().unwrap(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_single_operations() {
        let provider = Arc::new(MockSearchProvider::default());
        let loader = LocationLoader::new(provider.clone());
        let location = &locations()[0];

        loader.add_one(location, "locations-en").await.unwrap();
        loader.update_one(location, "locations-en").await.unwrap();
        loader.remove_one(location, "locations-en").await.unwrap();

        assert_eq!(
            *provider.calls.lock().unwrap(),
            vec!["index", "update", "delete"]
        );
    }

    #[tokio::test]
    async fn test_single_add_surfaces_transport_failure() {
        let provider = Arc::new(MockSearchProvider {
            broken: true,
            ..Default::default()
        });
        let loader = LocationLoader::new(provider);

        assert!(loader.add_one(&locations()[0], "locations-en").await.is_err());
    }
}

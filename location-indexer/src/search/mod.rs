//! Read path over the location indexes.

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::errors::QueryError;
use location_indexer_repository::{IndexOptions, SearchIndexProvider};
use location_indexer_shared::{LocationQuery, SearchDocument};

/// Search, suggest and get-by-id against the index of a language.
///
/// Requests without a language use the service default.
#[derive(Clone)]
pub struct LocationsService {
    provider: Arc<dyn SearchIndexProvider>,
    indexes: IndexOptions,
    default_language: String,
}

impl LocationsService {
    pub fn new(
        provider: Arc<dyn SearchIndexProvider>,
        indexes: IndexOptions,
        default_language: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            indexes,
            default_language: default_language.into(),
        }
    }

    /// Free-text search paged with `skip`/`top`.
    #[instrument(skip(self), fields(query = %query.query, skip = query.skip, top = query.top))]
    pub async fn search(&self, query: &LocationQuery) -> Result<Vec<SearchDocument>, QueryError> {
        query.validate().map_err(QueryError::invalid)?;
        let index = self.resolve_index(query.language.as_deref())?;

        let documents = self
            .provider
            .search(index, query.query.trim(), query.skip, query.top)
            .await?;

        debug!(count = documents.len(), index = %index, "Search completed");
        Ok(documents)
    }

    /// Completion suggestions for a prefix.
    #[instrument(skip(self))]
    pub async fn suggest(
        &self,
        prefix: &str,
        top: usize,
        language: Option<&str>,
    ) -> Result<Vec<SearchDocument>, QueryError> {
        let query = LocationQuery {
            query: prefix.to_string(),
            skip: 0,
            top,
            language: None,
        };
        query.validate().map_err(QueryError::invalid)?;
        let index = self.resolve_index(language)?;

        Ok(self.provider.suggest(index, prefix.trim(), top).await?)
    }

    /// Fetch a location document by its HtId.
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        ht_id: &str,
        language: Option<&str>,
    ) -> Result<SearchDocument, QueryError> {
        if ht_id.trim().is_empty() {
            return Err(QueryError::invalid("Location id cannot be empty"));
        }
        let index = self.resolve_index(language)?;

        self.provider
            .get_document(index, ht_id)
            .await?
            .ok_or_else(|| QueryError::NotFound(ht_id.to_string()))
    }

    fn resolve_index(&self, language: Option<&str>) -> Result<&str, QueryError> {
        let language = language
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(self.default_language.as_str());
        self.indexes.index_for(language).ok_or_else(|| {
            QueryError::Configuration(format!(
                "No index is configured for language '{}'",
                language
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use location_indexer_repository::{BatchOperationSummary, SearchIndexError};
    use location_indexer_shared::{GeoPoint, Suggestion};
    use std::sync::Mutex;

    fn document(id: &str) -> SearchDocument {
        SearchDocument {
            id: id.to_string(),
            name: String::new(),
            locality: "Dubai".to_string(),
            country: "United Arab Emirates".to_string(),
            country_code: "AE".to_string(),
            suggestion: Suggestion::new(vec!["Dubai".to_string()]),
            prediction_text: "Dubai, United Arab Emirates".to_string(),
            coordinates: GeoPoint::default(),
            distance_in_meters: None,
            location_type: "locality".to_string(),
            kind: "City".to_string(),
            modified: Utc::now(),
        }
    }

    /// Serves `stored` from every index and records (index, skip, top) of each query.
    #[derive(Default)]
    struct MockSearchProvider {
        stored: Vec<SearchDocument>,
        queries: Mutex<Vec<(String, usize, usize)>>,
        broken: bool,
    }

    #[async_trait]
    impl SearchIndexProvider for MockSearchProvider {
        async fn recreate_index(&self, _index: &str) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn index_document(
            &self,
            _index: &str,
            _document: &SearchDocument,
        ) -> Result<(), SearchIndexError> {
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
            _document_id: &str,
        ) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn bulk_index_documents(
            &self,
            _index: &str,
            _documents: &[SearchDocument],
        ) -> Result<BatchOperationSummary, SearchIndexError> {
            Ok(BatchOperationSummary::empty())
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
            index: &str,
            _query: &str,
            skip: usize,
            top: usize,
        ) -> Result<Vec<SearchDocument>, SearchIndexError> {
            if self.broken {
                return Err(SearchIndexError::search("cluster unavailable"));
            }
            self.queries
                .lock()
                .unwrap()
                .push((index.to_string(), skip, top));
            Ok(self.stored.iter().skip(skip).take(top).cloned().collect())
        }

        async fn suggest(
            &self,
            index: &str,
            _prefix: &str,
            top: usize,
        ) -> Result<Vec<SearchDocument>, SearchIndexError> {
            self.queries.lock().unwrap().push((index.to_string(), 0, top));
            Ok(self.stored.iter().take(top).cloned().collect())
        }

        async fn get_document(
            &self,
            _index: &str,
            document_id: &str,
        ) -> Result<Option<SearchDocument>, SearchIndexError> {
            if self.broken {
                return Err(SearchIndexError::connection("connection refused"));
            }
            Ok(self.stored.iter().find(|d| d.id == document_id).cloned())
        }
    }

    fn service_with(provider: MockSearchProvider) -> (LocationsService, Arc<MockSearchProvider>) {
        let provider = Arc::new(provider);
        let indexes = IndexOptions::default()
            .with_index("en", "locations-en")
            .with_index("ru", "locations-ru");
        (
            LocationsService::new(provider.clone(), indexes, "en"),
            provider,
        )
    }

    #[tokio::test]
    async fn test_search_pages_through_results() {
        let (service, provider) = service_with(MockSearchProvider {
            stored: vec![document("A"), document("B"), document("C")],
            ..Default::default()
        });

        let page = service
            .search(&LocationQuery::new("dub").with_skip(1).with_top(1))
            .await
            .unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "B");
        assert_eq!(
            *provider.queries.lock().unwrap(),
            vec![("locations-en".to_string(), 1, 1)]
        );
    }

    #[tokio::test]
    async fn test_search_uses_language_index() {
        let (service, provider) = service_with(MockSearchProvider::default());

        service
            .search(&LocationQuery::new("dub").with_language("RU"))
            .await
            .unwrap();

        assert_eq!(provider.queries.lock().unwrap()[0].0, "locations-ru");
    }

    #[tokio::test]
    async fn test_search_rejects_invalid_queries() {
        let (service, _) = service_with(MockSearchProvider::default());

        let empty = service.search(&LocationQuery::new("  ")).await;
        assert!(matches!(empty, Err(QueryError::InvalidRequest(_))));

        let mut zero = LocationQuery::new("dub");
        zero.top = 0;
        assert!(matches!(
            service.search(&zero).await,
            Err(QueryError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_language_is_configuration_error() {
        let (service, _) = service_with(MockSearchProvider::default());

        let result = service
            .search(&LocationQuery::new("dub").with_language("ar"))
            .await;

        assert!(matches!(result, Err(QueryError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_get_distinguishes_not_found_from_backend_error() {
        let (service, _) = service_with(MockSearchProvider {
            stored: vec![document("A")],
            ..Default::default()
        });

        assert_eq!(service.get("A", None).await.unwrap().id, "A");
        assert!(matches!(
            service.get("missing", None).await,
            Err(QueryError::NotFound(id)) if id == "missing"
        ));

        let (broken, _) = service_with(MockSearchProvider {
            broken: true,
            ..Default::default()
        });
        assert!(matches!(
            broken.get("A", None).await,
            Err(QueryError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn test_suggest_validates_top() {
        let (service, provider) = service_with(MockSearchProvider {
            stored: vec![document("A"), document("B")],
            ..Default::default()
        });

        assert_eq!(service.suggest("du", 1, None).await.unwrap().len(), 1);
        assert!(matches!(
            service.suggest("du", 0, None).await,
            Err(QueryError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.suggest("du", 101, None).await,
            Err(QueryError::InvalidRequest(_))
        ));
        assert_eq!(provider.queries.lock().unwrap().len(), 1);
    }
}

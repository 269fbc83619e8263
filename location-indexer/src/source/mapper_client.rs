//! HTTP client for the mapper's locations endpoint.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::Client as ReqwestClient;
use tracing::{debug, instrument};
use url::Url;

use super::LocationSource;
use crate::errors::SourceError;
use location_indexer_shared::{Location, LocationType};

const LOCATIONS_PATH: &str = "api/1.0/locations";

/// Production `LocationSource` backed by the mapper HTTP API.
#[derive(Clone)]
pub struct MapperClient {
    client: ReqwestClient,
    endpoint: Url,
    access_token: Option<String>,
}

impl MapperClient {
    /// Create a client for the mapper at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Mapper root, e.g. `https://mapper.example.com`
    /// * `access_token` - Bearer token sent with every request, if any
    ///
    /// # Returns
    ///
    /// * `Ok(MapperClient)` - A new client
    /// * `Err(SourceError)` - If the URL cannot be parsed
    pub fn new(base_url: &str, access_token: Option<String>) -> Result<Self, SourceError> {
        let endpoint = Self::endpoint(base_url)?;
        Ok(Self {
            client: ReqwestClient::new(),
            endpoint,
            access_token,
        })
    }

    fn endpoint(base_url: &str) -> Result<Url, SourceError> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)
            .and_then(|url| url.join(LOCATIONS_PATH))
            .map_err(|e| SourceError::request(format!("Invalid mapper URL '{}': {}", base_url, e)))
    }

    fn query(
        location_type: LocationType,
        modified_since: Option<DateTime<Utc>>,
        skip: usize,
        top: usize,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![("locationType", location_type.as_str().to_string())];
        if let Some(modified) = modified_since {
            query.push((
                "modified",
                modified.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }
        query.push(("skip", skip.to_string()));
        query.push(("top", top.to_string()));
        query
    }
}

#[async_trait]
impl LocationSource for MapperClient {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn get_locations(
        &self,
        location_type: LocationType,
        language_code: &str,
        modified_since: Option<DateTime<Utc>>,
        skip: usize,
        top: usize,
    ) -> Result<Vec<Location>, SourceError> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .query(&Self::query(location_type, modified_since, skip, top))
            .header(ACCEPT_LANGUAGE, language_code);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let locations: Vec<Location> = response
            .json()
            .await
            .map_err(|e| SourceError::decode(e.to_string()))?;

        debug!(count = locations.len(), "Received locations from the mapper");
        Ok(locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_endpoint_joins_path() {
        let client = MapperClient::new("https://mapper.example.com", None).unwrap();
        assert_eq!(
            client.endpoint.as_str(),
            "https://mapper.example.com/api/1.0/locations"
        );

        let client = MapperClient::new("https://example.com/mapper/", None).unwrap();
        assert_eq!(
            client.endpoint.as_str(),
            "https://example.com/mapper/api/1.0/locations"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            MapperClient::new("not a url", None),
            Err(SourceError::Request(_))
        ));
    }

    #[test]
    fn test_query_without_modified_filter() {
        let query = MapperClient::query(LocationType::Locality, None, 20_000, 10_000);
        assert_eq!(
            query,
            vec![
                ("locationType", "locality".to_string()),
                ("skip", "20000".to_string()),
                ("top", "10000".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_with_modified_filter() {
        let since = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let query = MapperClient::query(LocationType::Country, Some(since), 0, 10);
        assert_eq!(query[1], ("modified", "2024-01-02T03:04:05Z".to_string()));
    }
}

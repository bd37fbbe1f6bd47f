//! Elasticsearch-backed nearest-point lookup.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use super::models::{nearest_point_query, GeoPoint, SearchResponse};
use super::GeoSearch;
use crate::config::{SearchConfig, MAX_ERROR_BODY_CHARS};
use crate::error_handling::{InitializationError, LookupError, TransportError};
use crate::grid::Coordinate;

/// Search client for a single `_search` endpoint with HTTP basic auth.
///
/// Cheap to share: the underlying `reqwest::Client` pools connections and is
/// safe to use from every band at once.
pub struct ElasticClient {
    client: Arc<reqwest::Client>,
    endpoint: Url,
    username: String,
    password: Option<String>,
}

impl ElasticClient {
    /// Creates a client for the endpoint and credentials in `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::EndpointError` if the endpoint is not a valid URL.
    pub fn new(
        client: Arc<reqwest::Client>,
        config: &SearchConfig,
    ) -> Result<Self, InitializationError> {
        let endpoint =
            Url::parse(&config.endpoint).map_err(|source| InitializationError::EndpointError {
                endpoint: config.endpoint.clone(),
                source,
            })?;
        Ok(Self {
            client,
            endpoint,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl GeoSearch for ElasticClient {
    async fn nearest(&self, coordinate: Coordinate, radius: &str) -> Result<GeoPoint, LookupError> {
        let transport = |source: TransportError| LookupError::Transport { coordinate, source };

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&nearest_point_query(coordinate, radius));
        if !self.username.is_empty() {
            request = request.basic_auth(&self.username, self.password.as_deref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport(TransportError::Request(e)))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport(TransportError::Request(e)))?;

        if !status.is_success() {
            let body: String = String::from_utf8_lossy(&body)
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(transport(TransportError::Status { status, body }));
        }

        let parsed: SearchResponse =
            serde_json::from_slice(&body).map_err(|e| transport(TransportError::Decode(e)))?;

        parsed
            .into_first_point()
            .ok_or_else(|| LookupError::NoMatch {
                coordinate,
                radius: radius.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_endpoint() {
        let config = SearchConfig {
            endpoint: "not a url".into(),
            ..SearchConfig::default()
        };
        let result = ElasticClient::new(Arc::new(reqwest::Client::new()), &config);
        assert!(matches!(
            result,
            Err(InitializationError::EndpointError { .. })
        ));
    }

    #[test]
    fn test_new_keeps_endpoint() {
        let config = SearchConfig {
            endpoint: "http://localhost:9200/zipcodes/_search".into(),
            username: "elastic".into(),
            password: Some("secret".into()),
            ..SearchConfig::default()
        };
        let client = ElasticClient::new(Arc::new(reqwest::Client::new()), &config).unwrap();
        assert_eq!(client.endpoint().path(), "/zipcodes/_search");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Port 9 (discard) is essentially never listening on loopback.
        let config = SearchConfig {
            endpoint: "http://127.0.0.1:9/_search".into(),
            ..SearchConfig::default()
        };
        let client = ElasticClient::new(Arc::new(reqwest::Client::new()), &config).unwrap();
        let err = client
            .nearest(Coordinate::new(700, 6870), "25km")
            .await
            .unwrap_err();
        assert!(err.is_retriable());
        assert_eq!(err.coordinate(), Coordinate::new(700, 6870));
    }
}

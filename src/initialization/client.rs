//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::SearchConfig;
use crate::error_handling::InitializationError;
use crate::search::ElasticClient;

/// Initializes the HTTP client shared by every band.
///
/// Creates a `reqwest::Client` configured with the search timeout and a
/// crate-identifying User-Agent. Connection pooling makes one client enough
/// for the whole run.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &SearchConfig) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes the search backend client on top of a fresh HTTP client.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the endpoint is invalid.
pub fn init_search(config: &SearchConfig) -> Result<Arc<ElasticClient>, InitializationError> {
    let client = init_client(config)?;
    Ok(Arc::new(ElasticClient::new(client, config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client() {
        assert!(init_client(&SearchConfig::default()).is_ok());
    }

    #[test]
    fn test_init_search_requires_endpoint() {
        // The default endpoint is empty and must be supplied by the caller.
        assert!(matches!(
            init_search(&SearchConfig::default()),
            Err(InitializationError::EndpointError { .. })
        ));
    }

    #[test]
    fn test_init_search_with_endpoint() {
        let config = SearchConfig {
            endpoint: "https://search.example.com/zipcodes/_search".into(),
            ..SearchConfig::default()
        };
        let search = init_search(&config).expect("valid endpoint");
        assert_eq!(search.endpoint().host_str(), Some("search.example.com"));
    }
}

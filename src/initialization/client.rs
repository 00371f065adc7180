//! HTTP client initialization.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::ClientBuilder;

use crate::error_handling::InitializationError;

/// Media type requested from the SPARQL endpoint.
pub(crate) const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Initializes the HTTP client used for query service requests.
///
/// Creates a `reqwest::Client` configured with:
/// - the operator-supplied User-Agent (the Wikidata endpoint blocks anonymous agents)
/// - a per-request timeout that covers the whole response body
/// - `Accept: application/sparql-results+json`
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(
    user_agent: &str,
    timeout: Duration,
) -> Result<reqwest::Client, InitializationError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(SPARQL_RESULTS_JSON));

    let client = ClientBuilder::new()
        .timeout(timeout)
        .user_agent(user_agent)
        .default_headers(headers)
        .build()?;
    Ok(client)
}

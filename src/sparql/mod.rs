//! Client for the Wikidata SPARQL endpoint.
//!
//! One call fetches one page (`LIMIT`/`OFFSET` window) of one category. The
//! client never retries; retry and backoff are the harvester's job.

mod query;
mod response;

use log::debug;
use url::Url;

use crate::error_handling::{ConfigError, FetchError};
use crate::storage::WebsiteRecord;

pub use query::build_query;
pub use response::parse_bindings;

/// Query service endpoint plus the HTTP client used to reach it.
#[derive(Debug, Clone)]
pub struct SparqlClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl SparqlClient {
    pub fn new(client: reqwest::Client, endpoint: &str) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ConfigError::InvalidEndpoint(endpoint.to_string(), e))?;
        Ok(SparqlClient { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches one page of instances of `entity`.
    ///
    /// # Errors
    ///
    /// - `FetchError::Endpoint` for any non-2xx status
    /// - `FetchError::Transport` when the request or body read fails
    /// - `FetchError::Malformed` when the body is not a complete SPARQL JSON result
    pub async fn fetch_page(
        &self,
        entity: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<WebsiteRecord>, FetchError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("query", &build_query(entity, limit, offset))
            .append_pair("format", "json");

        debug!("GET {} (entity {}, limit {}, offset {})", self.endpoint, entity, limit, offset);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Endpoint { status });
        }

        let body = response.text().await?;
        Ok(parse_bindings(&body)?)
    }
}

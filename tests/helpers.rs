// Shared test helpers: a paging SPARQL endpoint double and on-disk stores.
//
// The endpoint double answers each request from a synthetic dataset of `total`
// rows, honouring the LIMIT/OFFSET window embedded in the `query` parameter.

#![allow(dead_code)] // Each test binary uses a different subset

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tempfile::TempDir;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};
use wiremock::matchers::{method, path};

use wikidata_sites::categories::{self, Category};
use wikidata_sites::{HarvestConfig, RetryPolicy};

/// `(limit, offset)` requested by one call.
pub fn page_window(request: &Request) -> (usize, usize) {
    let query = request
        .url
        .query_pairs()
        .find(|(k, _)| k == "query")
        .map(|(_, v)| v.into_owned())
        .expect("request should carry a query parameter");
    let re = Regex::new(r"LIMIT (\d+)\s+OFFSET (\d+)").unwrap();
    let caps = re.captures(&query).expect("query should carry LIMIT and OFFSET");
    (caps[1].parse().unwrap(), caps[2].parse().unwrap())
}

/// Row `i` of the synthetic dataset.
pub fn dataset_row(i: usize) -> (String, String, String) {
    (
        format!("http://www.wikidata.org/entity/Q{}", 1000 + i),
        format!("Organisation {i}"),
        format!("https://www.site{i}.example.org/"),
    )
}

/// SPARQL JSON results body for the given rows.
pub fn bindings_body(rows: &[(String, String, String)]) -> String {
    let bindings: Vec<_> = rows
        .iter()
        .map(|(item, label, website)| {
            json!({
                "item": { "type": "uri", "value": item },
                "itemLabel": { "type": "literal", "value": label },
                "website": { "type": "uri", "value": website },
            })
        })
        .collect();
    json!({
        "head": { "vars": ["item", "itemLabel", "website"] },
        "results": { "bindings": bindings }
    })
    .to_string()
}

/// Serves `total` rows; requests for an offset in `failing_offsets` get a 500.
pub struct PagedDataset {
    pub total: usize,
    pub failing_offsets: HashSet<usize>,
}

impl PagedDataset {
    pub fn new(total: usize) -> Self {
        PagedDataset {
            total,
            failing_offsets: HashSet::new(),
        }
    }

    pub fn failing_at(mut self, offsets: &[usize]) -> Self {
        self.failing_offsets.extend(offsets);
        self
    }
}

impl Respond for PagedDataset {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let (limit, offset) = page_window(request);
        if self.failing_offsets.contains(&offset) {
            return ResponseTemplate::new(500).set_body_string("java.util.concurrent.TimeoutException");
        }
        let end = (offset + limit).min(self.total);
        let rows: Vec<_> = (offset.min(end)..end).map(dataset_row).collect();
        ResponseTemplate::new(200)
            .insert_header("content-type", "application/sparql-results+json")
            .set_body_string(bindings_body(&rows))
    }
}

/// Starts an endpoint double serving `dataset` at `/sparql`.
pub async fn start_endpoint(dataset: PagedDataset) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sparql"))
        .respond_with(dataset)
        .mount(&server)
        .await;
    server
}

/// Windows of every request the endpoint received, in order.
pub async fn requested_windows(server: &MockServer) -> Vec<(usize, usize)> {
    server
        .received_requests()
        .await
        .expect("request recording should be enabled")
        .iter()
        .map(page_window)
        .collect()
}

pub fn category(label: &str) -> Category {
    *categories::find(label).expect("known category")
}

/// Harvest config pointed at `server`, with no backoff waits.
pub fn test_config(server: &MockServer, db_path: &Path, page_size: usize, max_records: usize) -> HarvestConfig {
    HarvestConfig {
        db_path: db_path.to_path_buf(),
        endpoint: format!("{}/sparql", server.uri()),
        user_agent: "wikidata_sites_test/1.0".to_string(),
        timeout: Duration::from_secs(5),
        max_records,
        page_size,
        categories: vec![category("Bank")],
        retry: RetryPolicy {
            max_attempts: 3,
            backoff_base: Duration::ZERO,
            shrink_after_attempt: 2,
            shrink_floor: 4,
        },
    }
}

/// Fresh directory plus a database path inside it (the file does not exist yet).
pub fn temp_db() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let db_path = dir.path().join("sites.db");
    (dir, db_path)
}

/// Opens an on-disk store for assertions, creating the file if needed.
pub async fn open_pool(db_path: &Path) -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&format!("sqlite:{}?mode=rwc", db_path.display()))
        .await
        .expect("Failed to open test database")
}

pub async fn row_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM websites")
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}

//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources of a run:
//! - HTTP client for the query service
//! - Domain extractor used by the enricher
//! - Logger
//!
//! The database pool lives in `storage::pool`.

mod client;
mod logger;

use tldextract::{TldExtractor, TldOption};

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Initializes the public-suffix extractor used for domain decomposition.
///
/// Uses the suffix list bundled with `tldextract`; nothing is fetched from the
/// network, so every run classifies the same URL the same way.
pub fn init_extractor() -> TldExtractor {
    TldExtractor::new(TldOption::default())
}

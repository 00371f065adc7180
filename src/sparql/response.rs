//! SPARQL JSON result decoding.
//!
//! Only the fields the harvester stores are decoded; `type`, `xml:lang` and the
//! `head` section are ignored.

use serde::Deserialize;

use crate::storage::WebsiteRecord;

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<Binding>,
}

/// One result row. `item` is mandatory; a binding without it fails decoding.
#[derive(Debug, Deserialize)]
struct Binding {
    item: Term,
    #[serde(rename = "itemLabel", default)]
    item_label: Option<Term>,
    #[serde(default)]
    website: Option<Term>,
}

#[derive(Debug, Deserialize)]
struct Term {
    value: String,
}

impl From<Binding> for WebsiteRecord {
    fn from(b: Binding) -> Self {
        WebsiteRecord {
            item: b.item.value,
            item_label: b.item_label.map(|t| t.value).unwrap_or_default(),
            website: b.website.map(|t| t.value).unwrap_or_default(),
        }
    }
}

/// Decodes a `application/sparql-results+json` body into storable records.
///
/// # Errors
///
/// Any syntax error (including a body cut off mid-stream) or a missing
/// `results.bindings` / `item` is returned as a `serde_json::Error`.
pub fn parse_bindings(body: &str) -> Result<Vec<WebsiteRecord>, serde_json::Error> {
    let response: SparqlResponse = serde_json::from_str(body)?;
    Ok(response
        .results
        .bindings
        .into_iter()
        .map(WebsiteRecord::from)
        .collect())
}

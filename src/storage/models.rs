// storage/models.rs
// Database models and types

/// One harvested (entity, website) pair ready for insertion.
///
/// Maps to the harvester-owned columns of the `websites` table; the category
/// label is supplied per page by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteRecord {
    /// Entity IRI, e.g. `http://www.wikidata.org/entity/Q95`
    pub item: String,
    /// English label, empty when the label service had none
    pub item_label: String,
    pub website: String,
}

/// Natural key of a row still waiting for enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRow {
    pub item: String,
    pub website: String,
}

/// Enrichment result for one row, addressed by natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainUpdate {
    pub item: String,
    pub website: String,
    /// Registrable domain, or `""` when none could be extracted
    pub domain: String,
    pub subdomain: Option<String>,
}

/// Enrichment status of a stored row, decoded from the `domain`/`subdomain` columns.
///
/// The table encodes this as `domain IS NULL` (not processed) and `domain = ''`
/// (processed, nothing extractable); this enum is the typed view of that encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentState {
    /// Has a URL, not processed yet.
    Pending,
    /// No URL; never selected for enrichment.
    Ineligible,
    Resolved {
        domain: String,
        subdomain: Option<String>,
    },
    Unresolvable,
}

impl EnrichmentState {
    pub fn from_columns(website: Option<&str>, domain: Option<String>, subdomain: Option<String>) -> Self {
        match domain {
            Some(d) if d.is_empty() => EnrichmentState::Unresolvable,
            Some(domain) => EnrichmentState::Resolved { domain, subdomain },
            None if website.map_or(true, str::is_empty) => EnrichmentState::Ineligible,
            None => EnrichmentState::Pending,
        }
    }
}

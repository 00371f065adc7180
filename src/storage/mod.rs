// storage/mod.rs
// Database operations module

pub mod models;
pub mod pool;
pub mod schema;
pub mod summary;
#[cfg(test)]
pub(crate) mod test_helpers;
pub mod websites;

// Re-export commonly used items
pub use models::{DomainUpdate, EnrichmentState, PendingRow, WebsiteRecord};
pub use pool::init_db_pool_with_path;
pub use schema::{create_table, ensure_enrichment_columns, has_enrichment_columns};
pub use summary::{summarize_store, StoreSummary};
pub use websites::{count_rows, enrichment_state, insert_page, select_unprocessed, update_domains};

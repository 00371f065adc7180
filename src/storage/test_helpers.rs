//! Shared test helpers for storage module tests.

#[cfg(test)]
use sqlx::sqlite::SqlitePoolOptions;
#[cfg(test)]
use sqlx::SqlitePool;

#[cfg(test)]
use crate::storage::create_table;
#[cfg(test)]
use crate::storage::models::WebsiteRecord;

/// Creates an empty in-memory database.
///
/// One connection only: every connection to `sqlite::memory:` would otherwise
/// see its own database.
#[cfg(test)]
pub async fn create_test_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool")
}

/// In-memory database with the current `websites` schema.
#[cfg(test)]
pub async fn create_test_store() -> SqlitePool {
    let pool = create_test_pool().await;
    create_table(&pool).await.expect("Failed to create table");
    pool
}

/// The four-column table written by harvesters that predate enrichment.
#[cfg(test)]
pub async fn create_legacy_table(pool: &SqlitePool) {
    sqlx::query(
        "CREATE TABLE websites (
            item TEXT, item_label TEXT, website TEXT, type_label TEXT,
            PRIMARY KEY (item, website)
        )",
    )
    .execute(pool)
    .await
    .expect("Failed to create legacy table");
}

#[cfg(test)]
pub fn record(item: &str, website: &str) -> WebsiteRecord {
    WebsiteRecord {
        item: item.to_string(),
        item_label: format!("Label {item}"),
        website: website.to_string(),
    }
}

// storage/schema.rs
// Table creation and additive column evolution

use std::collections::HashSet;

use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::report::Reporter;

/// Columns added by the enricher, in the order they are added.
///
/// Stores written by older harvesters only have the four harvest columns.
pub const ENRICHMENT_COLUMNS: &[&str] = &["domain", "subdomain"];

/// Creates the `websites` table if it doesn't exist.
///
/// `(item, website)` is the natural key; `INSERT OR IGNORE` against it is what
/// makes re-harvesting idempotent.
pub async fn create_table(pool: &SqlitePool) -> Result<(), DatabaseError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS websites (
            item TEXT,
            item_label TEXT,
            website TEXT,
            type_label TEXT,
            domain TEXT,
            subdomain TEXT,
            PRIMARY KEY (item, website)
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Column names currently present on `websites` (empty if the table is missing).
pub async fn table_columns(pool: &SqlitePool) -> Result<HashSet<String>, DatabaseError> {
    let rows = sqlx::query("PRAGMA table_info(websites)")
        .fetch_all(pool)
        .await?;
    rows.iter()
        .map(|row| row.try_get::<String, _>("name").map_err(DatabaseError::from))
        .collect()
}

/// Whether the enrichment columns exist yet.
pub async fn has_enrichment_columns(pool: &SqlitePool) -> Result<bool, DatabaseError> {
    let columns = table_columns(pool).await?;
    Ok(ENRICHMENT_COLUMNS.iter().all(|c| columns.contains(*c)))
}

/// Adds any missing enrichment column with a non-destructive `ALTER TABLE`.
///
/// Existing rows get NULL in the new columns, which is exactly the
/// "not yet processed" marker. Returns the columns that were added.
pub async fn ensure_enrichment_columns(
    pool: &SqlitePool,
    reporter: &dyn Reporter,
) -> Result<Vec<&'static str>, DatabaseError> {
    let mut current = table_columns(pool).await?;
    let mut added = Vec::new();
    for column in ENRICHMENT_COLUMNS {
        if current.contains(*column) {
            continue;
        }
        reporter.info(&format!("Adding column {}", column));
        sqlx::query(&format!("ALTER TABLE websites ADD COLUMN {} TEXT", column))
            .execute(pool)
            .await?;
        current.insert(column.to_string());
        added.push(*column);
    }
    Ok(added)
}

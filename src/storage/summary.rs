// storage/summary.rs
// Read-only store statistics for the `status` command and run reports

use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;

use super::schema::{has_enrichment_columns, table_columns};

/// Row counts over the `websites` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSummary {
    pub total_rows: i64,
    /// `(type_label, rows)` ordered by label
    pub per_category: Vec<(String, i64)>,
    /// Has a URL, not enriched yet
    pub pending: i64,
    /// Enriched with a registrable domain
    pub resolved: i64,
    /// Enriched with the empty-domain sentinel
    pub unresolvable: i64,
    /// No URL; never enriched
    pub ineligible: i64,
    /// False for stores written before enrichment columns existed
    pub has_enrichment_columns: bool,
}

/// Counts rows per category and per enrichment state.
///
/// Never alters the schema. On a store without enrichment columns every row
/// with a URL is reported as pending.
pub async fn summarize_store(pool: &SqlitePool) -> Result<StoreSummary, DatabaseError> {
    if table_columns(pool).await?.is_empty() {
        return Ok(StoreSummary::default());
    }

    let total_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM websites")
        .fetch_one(pool)
        .await?;

    let per_category: Vec<(String, i64)> = sqlx::query_as(
        "SELECT COALESCE(type_label, ''), COUNT(*)
         FROM websites
         GROUP BY type_label
         ORDER BY type_label",
    )
    .fetch_all(pool)
    .await?;

    let ineligible: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM websites WHERE website IS NULL OR website = ''")
            .fetch_one(pool)
            .await?;

    let has_columns = has_enrichment_columns(pool).await?;
    let (pending, resolved, unresolvable) = if has_columns {
        sqlx::query_as::<_, (i64, i64, i64)>(
            "SELECT
                COALESCE(SUM(domain IS NULL AND website IS NOT NULL AND website <> ''), 0),
                COALESCE(SUM(domain IS NOT NULL AND domain <> ''), 0),
                COALESCE(SUM(domain = ''), 0)
             FROM websites",
        )
        .fetch_one(pool)
        .await?
    } else {
        (total_rows - ineligible, 0, 0)
    };

    Ok(StoreSummary {
        total_rows,
        per_category,
        pending,
        resolved,
        unresolvable,
        ineligible,
        has_enrichment_columns: has_columns,
    })
}

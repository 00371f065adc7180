// storage/websites.rs
// Reads and writes against the `websites` table

use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;

use super::models::{DomainUpdate, EnrichmentState, PendingRow, WebsiteRecord};

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// Inserts one fetched page in a single transaction.
///
/// Rows whose `(item, website)` already exist are skipped by `INSERT OR IGNORE`,
/// so the first category label seen for a pair is never overwritten. The
/// transaction is committed before returning; a failure part-way leaves nothing
/// of the page behind.
///
/// # Returns
///
/// The number of rows actually inserted (duplicates excluded).
pub async fn insert_page(
    pool: &SqlitePool,
    records: &[WebsiteRecord],
    type_label: &str,
) -> Result<u64, DatabaseError> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0;
    for record in records {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO websites (item, item_label, website, type_label)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&record.item)
        .bind(&record.item_label)
        .bind(&record.website)
        .bind(type_label)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to insert website {} for {}: {}", record.website, record.item, e);
            DatabaseError::SqlError(e)
        })?;
        inserted += result.rows_affected();
    }
    tx.commit().await?;
    Ok(inserted)
}

/// Selects up to `limit` rows that have a URL and no enrichment yet.
pub async fn select_unprocessed(
    pool: &SqlitePool,
    limit: usize,
) -> Result<Vec<PendingRow>, DatabaseError> {
    let rows = sqlx::query(
        "SELECT item, website
         FROM websites
         WHERE domain IS NULL
           AND website IS NOT NULL
           AND website <> ''
         LIMIT ?",
    )
    .bind(sql_limit(limit))
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<PendingRow, DatabaseError> {
            Ok(PendingRow {
                item: row.try_get("item")?,
                website: row.try_get("website")?,
            })
        })
        .collect()
}

/// Writes a batch of enrichment results in one transaction, keyed by `(item, website)`.
///
/// # Returns
///
/// The number of rows updated.
pub async fn update_domains(
    pool: &SqlitePool,
    updates: &[DomainUpdate],
) -> Result<u64, DatabaseError> {
    let mut tx = pool.begin().await?;
    let mut updated = 0;
    for update in updates {
        let result = sqlx::query(
            "UPDATE websites SET domain = ?, subdomain = ?
             WHERE item = ? AND website = ?",
        )
        .bind(&update.domain)
        .bind(&update.subdomain)
        .bind(&update.item)
        .bind(&update.website)
        .execute(&mut *tx)
        .await?;
        updated += result.rows_affected();
    }
    tx.commit().await?;
    Ok(updated)
}

/// Enrichment state of one row, or `None` if the pair is not stored.
pub async fn enrichment_state(
    pool: &SqlitePool,
    item: &str,
    website: &str,
) -> Result<Option<EnrichmentState>, DatabaseError> {
    let row = sqlx::query(
        "SELECT website, domain, subdomain FROM websites WHERE item = ? AND website = ?",
    )
    .bind(item)
    .bind(website)
    .fetch_optional(pool)
    .await?;

    row.map(|row| -> Result<EnrichmentState, DatabaseError> {
        let website: Option<String> = row.try_get("website")?;
        Ok(EnrichmentState::from_columns(
            website.as_deref(),
            row.try_get("domain")?,
            row.try_get("subdomain")?,
        ))
    })
    .transpose()
}

/// Number of rows in the table.
pub async fn count_rows(pool: &SqlitePool) -> Result<i64, DatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM websites")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

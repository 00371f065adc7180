//! Backfill of the `domain` / `subdomain` columns.
//!
//! The scan re-queries `domain IS NULL` on every iteration instead of keeping a
//! cursor. Each batch writes a non-NULL domain (possibly the empty sentinel)
//! for every row it selected, so the backlog shrinks by a full batch per
//! iteration and an interrupted run resumes by simply starting again.

use sqlx::SqlitePool;
use tldextract::TldExtractor;

use crate::domain::decompose_url;
use crate::error_handling::DatabaseError;
use crate::report::Reporter;
use crate::storage::{ensure_enrichment_columns, select_unprocessed, update_domains, DomainUpdate};

/// Outcome of an enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichReport {
    /// Columns added to a legacy table before the scan
    pub columns_added: Vec<&'static str>,
    pub batches: usize,
    /// Rows written (resolved + unresolvable)
    pub updated: u64,
    pub resolved: u64,
    pub unresolvable: u64,
}

/// Decomposes each selected row's URL.
pub fn derive_updates(
    extractor: &TldExtractor,
    rows: Vec<crate::storage::PendingRow>,
) -> Vec<DomainUpdate> {
    rows.into_iter()
        .map(|row| {
            let (domain, subdomain) = decompose_url(extractor, &row.website).into_columns();
            DomainUpdate {
                item: row.item,
                website: row.website,
                domain,
                subdomain,
            }
        })
        .collect()
}

/// Processes every pending row in batches of `batch_size` until none are left.
///
/// # Errors
///
/// Storage failures abort the run; batches committed before the failure stay.
pub async fn backfill(
    pool: &SqlitePool,
    extractor: &TldExtractor,
    batch_size: usize,
    reporter: &dyn Reporter,
) -> Result<EnrichReport, DatabaseError> {
    let mut report = EnrichReport::default();
    let batch_size = batch_size.max(1);

    loop {
        let rows = select_unprocessed(pool, batch_size).await?;
        if rows.is_empty() {
            break;
        }

        let updates = derive_updates(extractor, rows);
        let unresolvable = updates.iter().filter(|u| u.domain.is_empty()).count() as u64;
        let selected = updates.len() as u64;

        let written = update_domains(pool, &updates).await?;
        report.batches += 1;
        report.updated += written;
        report.unresolvable += unresolvable;
        report.resolved += selected - unresolvable;
        reporter.info(&format!(
            "Updated {} rows (running total {})",
            written, report.updated
        ));
    }

    reporter.info(&format!(
        "✓ Finished - {} rows enriched ({} with a domain, {} without)",
        report.updated, report.resolved, report.unresolvable
    ));
    Ok(report)
}

/// Adds missing enrichment columns, then runs [`backfill`].
pub async fn enrich_store(
    pool: &SqlitePool,
    extractor: &TldExtractor,
    batch_size: usize,
    reporter: &dyn Reporter,
) -> Result<EnrichReport, DatabaseError> {
    let columns_added = ensure_enrichment_columns(pool, reporter).await?;
    let report = backfill(pool, extractor, batch_size, reporter).await?;
    Ok(EnrichReport {
        columns_added,
        ..report
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initialization::init_extractor;
    use crate::report::MemoryReporter;
    use crate::storage::test_helpers::{create_legacy_table, create_test_pool, create_test_store, record};
    use crate::storage::{enrichment_state, insert_page, EnrichmentState};

    async fn columns(pool: &SqlitePool) -> Vec<(String, String, Option<String>, Option<String>)> {
        sqlx::query_as("SELECT item, website, domain, subdomain FROM websites ORDER BY item, website")
            .fetch_all(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_backfill_processes_everything_then_is_a_no_op() {
        let pool = create_test_store().await;
        let page: Vec<_> = (0..7)
            .map(|i| record(&format!("Q{i}"), &format!("http://www.site{i}.com/")))
            .chain([record("Q8", "http://localhost/x"), record("Q9", "")])
            .collect();
        insert_page(&pool, &page, "Bank").await.unwrap();

        let extractor = init_extractor();
        let reporter = MemoryReporter::new();
        let first = backfill(&pool, &extractor, 3, &reporter).await.unwrap();
        assert_eq!(first.updated, 8);
        assert_eq!(first.resolved, 7);
        assert_eq!(first.unresolvable, 1);
        assert_eq!(first.batches, 3);
        assert!(select_unprocessed(&pool, 100).await.unwrap().is_empty());

        let snapshot = columns(&pool).await;
        let second = backfill(&pool, &extractor, 3, &reporter).await.unwrap();
        assert_eq!(second.updated, 0);
        assert_eq!(second.batches, 0);
        assert_eq!(columns(&pool).await, snapshot);
    }

    #[tokio::test]
    async fn test_backfill_writes_www_and_subdomain_semantics() {
        let pool = create_test_store().await;
        insert_page(
            &pool,
            &[
                record("Q1", "http://www.example.com/x"),
                record("Q2", "http://shop.example.com/x"),
                record("Q3", "http://localhost/x"),
            ],
            "Shop",
        )
        .await
        .unwrap();

        backfill(&pool, &init_extractor(), 10, &MemoryReporter::new())
            .await
            .unwrap();

        assert_eq!(
            enrichment_state(&pool, "Q1", "http://www.example.com/x").await.unwrap(),
            Some(EnrichmentState::Resolved {
                domain: "example.com".into(),
                subdomain: None
            })
        );
        assert_eq!(
            enrichment_state(&pool, "Q2", "http://shop.example.com/x").await.unwrap(),
            Some(EnrichmentState::Resolved {
                domain: "example.com".into(),
                subdomain: Some("shop.example.com".into())
            })
        );
        assert_eq!(
            enrichment_state(&pool, "Q3", "http://localhost/x").await.unwrap(),
            Some(EnrichmentState::Unresolvable)
        );
    }

    #[tokio::test]
    async fn test_empty_urls_stay_unprocessed() {
        let pool = create_test_store().await;
        insert_page(&pool, &[record("Q1", "")], "Bank").await.unwrap();

        let report = backfill(&pool, &init_extractor(), 10, &MemoryReporter::new())
            .await
            .unwrap();
        assert_eq!(report.updated, 0);
        assert_eq!(
            enrichment_state(&pool, "Q1", "").await.unwrap(),
            Some(EnrichmentState::Ineligible)
        );
    }

    #[tokio::test]
    async fn test_enrich_store_upgrades_legacy_table() {
        let pool = create_test_pool().await;
        create_legacy_table(&pool).await;
        sqlx::query("INSERT INTO websites VALUES ('Q1', 'One', 'https://www.one.co.uk/', 'Bank')")
            .execute(&pool)
            .await
            .unwrap();

        let report = enrich_store(&pool, &init_extractor(), 10, &MemoryReporter::new())
            .await
            .unwrap();
        assert_eq!(report.columns_added, vec!["domain", "subdomain"]);
        assert_eq!(report.updated, 1);
        assert_eq!(
            enrichment_state(&pool, "Q1", "https://www.one.co.uk/").await.unwrap(),
            Some(EnrichmentState::Resolved {
                domain: "one.co.uk".into(),
                subdomain: None
            })
        );
    }
}

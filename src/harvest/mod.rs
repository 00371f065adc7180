//! Paginated, retrying harvest of category pages into the store.
//!
//! For each category the harvester walks `OFFSET 0, page, 2 * page, ...` until a
//! short page signals the end of the data or the per-category ceiling is
//! reached. Each page is retried per [`RetryState`]; an offset that exhausts its
//! attempts is skipped and the walk continues. Every stored page is its own
//! committed transaction, so an interrupted run keeps all completed pages and a
//! re-run from offset 0 only re-inserts what `INSERT OR IGNORE` discards.

pub mod retry;

use sqlx::SqlitePool;

use crate::categories::Category;
use crate::config::RetryPolicy;
use crate::error_handling::{DatabaseError, ErrorStats, ErrorType};
use crate::report::Reporter;
use crate::sparql::SparqlClient;
use crate::storage::{insert_page, StoreSummary, WebsiteRecord};

pub use retry::{backoff_delays, RetryState, Transition};

/// Shared resources for one harvest run.
pub struct HarvestContext<'a> {
    pub client: &'a SparqlClient,
    pub pool: &'a SqlitePool,
    pub retry: &'a RetryPolicy,
    pub reporter: &'a dyn Reporter,
    pub error_stats: &'a ErrorStats,
}

/// Why a category stopped fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page came back shorter than requested (or empty).
    Exhausted,
    /// The per-category ceiling was reached.
    Ceiling,
    /// Offsets ran past the ceiling without an early stop (e.g. every page failed).
    OffsetLimit,
}

/// Outcome of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub label: String,
    /// Rows returned by the endpoint, duplicates included
    pub fetched: usize,
    /// Rows new to the store
    pub inserted: u64,
    /// Offsets requested, in order (one entry per offset, not per attempt)
    pub offsets: Vec<usize>,
    /// Offsets given up after all attempts failed
    pub abandoned_offsets: Vec<usize>,
    pub stop: StopReason,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default)]
pub struct HarvestReport {
    pub categories: Vec<CategoryReport>,
    pub total_fetched: usize,
    pub total_inserted: u64,
    /// Failed page attempts by kind
    pub errors: Vec<(ErrorType, usize)>,
    /// Store contents after the run; filled in by `run_harvest`
    pub store: StoreSummary,
}

impl HarvestReport {
    pub fn abandoned_offsets(&self) -> usize {
        self.categories
            .iter()
            .map(|c| c.abandoned_offsets.len())
            .sum()
    }
}

/// Fetches one offset, retrying per the context's policy.
///
/// # Returns
///
/// The rows and the page size they were requested with, or `None` when every
/// attempt failed and the offset is abandoned.
pub async fn fetch_page_with_retry(
    ctx: &HarvestContext<'_>,
    category: &Category,
    page_size: usize,
    offset: usize,
) -> Option<(Vec<WebsiteRecord>, usize)> {
    let mut state = RetryState::new(ctx.retry, page_size);
    loop {
        let limit = state.page_size();
        let err = match ctx.client.fetch_page(category.entity, limit, offset).await {
            Ok(rows) => return Some((rows, limit)),
            Err(e) => e,
        };
        ctx.error_stats.increment(err.error_type());

        let attempt = state.attempt();
        let transition = state.on_failure();
        let wait = match &transition {
            Transition::Retry { wait, .. } | Transition::Exhausted { wait } => *wait,
        };
        ctx.reporter.warn(&format!(
            "Attempt {}/{} failed for offset {} (limit {}): {} - waiting {:?}",
            attempt,
            state.max_attempts(),
            offset,
            limit,
            err,
            wait
        ));
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }

        match transition {
            Transition::Retry {
                page_size, shrunk, ..
            } => {
                if shrunk {
                    ctx.reporter
                        .info(&format!("Reducing batch size to {} for retries", page_size));
                }
            }
            Transition::Exhausted { .. } => {
                ctx.error_stats.increment(ErrorType::OffsetAbandoned);
                ctx.reporter.error(&format!(
                    "Skipping offset {} after {} unsuccessful attempts",
                    offset,
                    state.max_attempts()
                ));
                return None;
            }
        }
    }
}

/// Harvests up to `max_records` rows of one category.
///
/// The last request is shortened so the category never stores more than
/// `max_records` rows.
///
/// # Errors
///
/// Only storage failures are returned; fetch failures are absorbed per offset.
pub async fn harvest_category(
    ctx: &HarvestContext<'_>,
    category: &Category,
    max_records: usize,
    page_size: usize,
) -> Result<CategoryReport, DatabaseError> {
    ctx.reporter.info(&format!(
        "Fetching up to {} rows for type: {}",
        max_records, category.label
    ));

    let mut report = CategoryReport {
        label: category.label.to_string(),
        fetched: 0,
        inserted: 0,
        offsets: Vec::new(),
        abandoned_offsets: Vec::new(),
        stop: StopReason::OffsetLimit,
    };

    let page_size = page_size.max(1);
    let mut offset = 0;
    while offset < max_records {
        // Never ask for more than the ceiling still allows
        let request = page_size.min(max_records - report.fetched);
        report.offsets.push(offset);
        ctx.reporter.info(&format!(
            " -> Offset {} - {}",
            offset,
            offset + request - 1
        ));

        let Some((rows, limit)) = fetch_page_with_retry(ctx, category, request, offset).await
        else {
            report.abandoned_offsets.push(offset);
            offset += request;
            continue;
        };

        if rows.is_empty() {
            ctx.reporter.info("No data returned - early stop.");
            report.stop = StopReason::Exhausted;
            break;
        }

        let inserted = insert_page(ctx.pool, &rows, category.label).await?;
        report.fetched += rows.len();
        report.inserted += inserted;
        ctx.reporter.info(&format!(
            "   Inserted {} of {} (running total: {})",
            inserted,
            rows.len(),
            report.fetched
        ));

        if rows.len() < limit {
            ctx.reporter.info(&format!(
                "Short page ({} of {}) - early stop.",
                rows.len(),
                limit
            ));
            report.stop = StopReason::Exhausted;
            break;
        }
        if report.fetched >= max_records {
            report.stop = StopReason::Ceiling;
            break;
        }
        offset += limit;
    }

    ctx.reporter.info(&format!(
        "✓ Finished {} ({} rows, {} new)",
        category.label, report.fetched, report.inserted
    ));
    if !report.abandoned_offsets.is_empty() {
        ctx.reporter.warn(&format!(
            "{}: {} offset(s) skipped after repeated failures: {:?}",
            category.label,
            report.abandoned_offsets.len(),
            report.abandoned_offsets
        ));
    }
    Ok(report)
}

/// Harvests every category in order and accumulates the run totals.
pub async fn harvest_categories(
    ctx: &HarvestContext<'_>,
    categories: &[Category],
    max_records: usize,
    page_size: usize,
) -> Result<HarvestReport, DatabaseError> {
    let mut report = HarvestReport::default();
    for category in categories {
        let category_report = harvest_category(ctx, category, max_records, page_size).await?;
        report.total_fetched += category_report.fetched;
        report.total_inserted += category_report.inserted;
        report.categories.push(category_report);
    }
    report.errors = ctx.error_stats.non_zero();
    Ok(report)
}

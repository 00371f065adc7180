//! wikidata_sites library: harvest and enrich official websites of Wikidata organisations
//!
//! The library pages through the Wikidata SPARQL endpoint for a fixed list of
//! organisation categories, stores `(item, label, website, category)` rows in
//! SQLite, and backfills each row's registrable domain and subdomain.
//!
//! # Example
//!
//! ```no_run
//! use wikidata_sites::{run_enrich, run_harvest, EnrichConfig, HarvestConfig, LogReporter};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let reporter = LogReporter::default();
//! let config = HarvestConfig {
//!     page_size: 20_000,
//!     ..Default::default()
//! };
//! let report = run_harvest(config, &reporter).await?;
//! println!("{} rows fetched, {} new", report.total_fetched, report.total_inserted);
//!
//! let enriched = run_enrich(EnrichConfig::default(), &reporter).await?;
//! println!("{} rows enriched", enriched.updated);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Work is strictly sequential: one
//! request in flight and one database connection.

pub mod categories;
pub mod config;
pub mod domain;
pub mod enrich;
pub mod error_handling;
pub mod harvest;
pub mod initialization;
pub mod report;
pub mod sparql;
pub mod storage;

// Re-export public API
pub use categories::{Category, CATEGORIES};
pub use config::{EnrichConfig, HarvestConfig, LogFormat, LogLevel, Opt, RetryPolicy};
pub use enrich::EnrichReport;
pub use harvest::{CategoryReport, HarvestReport, StopReason};
pub use report::{LogReporter, MemoryReporter, Reporter, Severity};
pub use run::{run_enrich, run_harvest, run_status};
pub use storage::StoreSummary;

// Entry points shared by the binary and the integration tests
mod run {
    use std::path::Path;

    use anyhow::{bail, Context, Result};

    use crate::config::{EnrichConfig, HarvestConfig};
    use crate::enrich::{enrich_store, EnrichReport};
    use crate::error_handling::ErrorStats;
    use crate::harvest::{harvest_categories, HarvestContext, HarvestReport};
    use crate::initialization::{init_client, init_extractor};
    use crate::report::Reporter;
    use crate::sparql::SparqlClient;
    use crate::storage::{create_table, init_db_pool_with_path, summarize_store, StoreSummary};

    /// Harvests every configured category into the database at `config.db_path`.
    ///
    /// Creates the database file and table when missing. Pages that keep failing
    /// are skipped and counted in the report rather than aborting the run.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The configuration is invalid
    /// - The database cannot be opened or written
    /// - The HTTP client cannot be built
    pub async fn run_harvest(config: HarvestConfig, reporter: &dyn Reporter) -> Result<HarvestReport> {
        config.validate().context("Invalid harvest configuration")?;

        let pool = init_db_pool_with_path(&config.db_path)
            .await
            .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;
        create_table(&pool)
            .await
            .context("Failed to create websites table")?;

        let http = init_client(&config.user_agent, config.timeout)
            .context("Failed to initialize HTTP client")?;
        let client = SparqlClient::new(http, &config.endpoint).context("Invalid endpoint")?;

        reporter.info(&format!(
            "Harvesting {} categor{} from {} (max {} rows each, pages of {})",
            config.categories.len(),
            if config.categories.len() == 1 { "y" } else { "ies" },
            client.endpoint(),
            config.max_records,
            config.page_size
        ));

        let error_stats = ErrorStats::new();
        let ctx = HarvestContext {
            client: &client,
            pool: &pool,
            retry: &config.retry,
            reporter,
            error_stats: &error_stats,
        };
        let mut report = harvest_categories(
            &ctx,
            &config.categories,
            config.max_records,
            config.page_size,
        )
        .await
        .context("Failed to store harvested rows")?;
        report.store = summarize_store(&pool)
            .await
            .context("Failed to read store summary")?;

        reporter.info(&format!(
            "✓ All done - {} rows fetched, {} new",
            report.total_fetched, report.total_inserted
        ));
        let abandoned = report.abandoned_offsets();
        if abandoned > 0 {
            reporter.warn(&format!(
                "{} offset(s) skipped after exhausting retries; re-run to fill the gaps",
                abandoned
            ));
        }
        for (error, count) in &report.errors {
            reporter.info(&format!("   {}: {}", error.as_str(), count));
        }
        reporter.info(&format!(
            "Store now holds {} rows in {} categories ({} awaiting enrichment)",
            report.store.total_rows,
            report.store.per_category.len(),
            report.store.pending
        ));

        pool.close().await;
        Ok(report)
    }

    /// Adds missing enrichment columns and backfills every pending row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is missing, has no `websites` table, or
    /// a batch cannot be written. Batches committed before the failure are kept.
    pub async fn run_enrich(config: EnrichConfig, reporter: &dyn Reporter) -> Result<EnrichReport> {
        config.validate().context("Invalid enrich configuration")?;
        ensure_exists(&config.db_path)?;

        let pool = init_db_pool_with_path(&config.db_path)
            .await
            .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;
        let extractor = init_extractor();
        let report = enrich_store(&pool, &extractor, config.batch_size, reporter)
            .await
            .context("Failed to enrich websites")?;

        pool.close().await;
        Ok(report)
    }

    /// Reads row counts without modifying the store.
    pub async fn run_status(db_path: &Path) -> Result<StoreSummary> {
        ensure_exists(db_path)?;
        let pool = init_db_pool_with_path(db_path)
            .await
            .with_context(|| format!("Failed to open database {}", db_path.display()))?;
        let summary = summarize_store(&pool)
            .await
            .context("Failed to read store summary")?;
        pool.close().await;
        Ok(summary)
    }

    fn ensure_exists(db_path: &Path) -> Result<()> {
        if !db_path.exists() {
            bail!("Database {} does not exist", db_path.display());
        }
        Ok(())
    }
}

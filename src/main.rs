//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `wikidata_sites` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Ctrl-C handling
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;

use anyhow::{Context, Result};
use structopt::StructOpt;

use wikidata_sites::config::{Command, Opt};
use wikidata_sites::initialization::init_logger_with;
use wikidata_sites::{
    run_enrich, run_harvest, run_status, EnrichConfig, HarvestConfig, LogReporter, StoreSummary,
};

// 128 + SIGINT
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::from_args();

    init_logger_with(opt.log_level.into(), opt.log_format).context("Failed to initialize logger")?;

    let outcome = tokio::select! {
        result = dispatch(opt.command) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match outcome {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) => {
            eprintln!("wikidata_sites error: {:#}", e);
            process::exit(1);
        }
        None => {
            // The dropped future rolls back any open transaction; committed pages stay.
            eprintln!("Interrupted - exiting cleanly.");
            process::exit(EXIT_INTERRUPTED);
        }
    }
}

async fn dispatch(command: Command) -> Result<()> {
    let reporter = LogReporter::default();
    match command {
        Command::Harvest(opt) => {
            let config = HarvestConfig::try_from(opt).context("Invalid harvest options")?;
            let db_path = config.db_path.clone();
            let report = run_harvest(config, &reporter).await?;
            println!(
                "✅ Harvested {} categor{}: {} rows fetched, {} new, {} offset{} skipped",
                report.categories.len(),
                if report.categories.len() == 1 { "y" } else { "ies" },
                report.total_fetched,
                report.total_inserted,
                report.abandoned_offsets(),
                if report.abandoned_offsets() == 1 { "" } else { "s" }
            );
            println!("Results saved in {}", db_path.display());
        }
        Command::Enrich(opt) => {
            let config = EnrichConfig::try_from(opt).context("Invalid enrich options")?;
            let report = run_enrich(config, &reporter).await?;
            println!(
                "✅ Enriched {} row{} ({} with a domain, {} unresolvable)",
                report.updated,
                if report.updated == 1 { "" } else { "s" },
                report.resolved,
                report.unresolvable
            );
        }
        Command::Status(opt) => {
            let summary = run_status(&opt.db).await?;
            print_summary(&summary);
        }
    }
    Ok(())
}

fn print_summary(summary: &StoreSummary) {
    println!("Rows: {}", summary.total_rows);
    for (label, rows) in &summary.per_category {
        println!("   {:<40} {}", label, rows);
    }
    if summary.has_enrichment_columns {
        println!(
            "Enrichment: {} resolved, {} unresolvable, {} pending, {} without URL",
            summary.resolved, summary.unresolvable, summary.pending, summary.ineligible
        );
    } else {
        println!(
            "Enrichment: not started ({} rows pending, {} without URL)",
            summary.pending, summary.ineligible
        );
    }
}

use std::path::PathBuf;
use std::time::Duration;

use structopt::StructOpt;
use strum::VariantNames;
use strum_macros::{Display, EnumString, VariantNames as VariantNamesMacro};

use crate::categories::{self, Category};
use crate::error_handling::ConfigError;

// constants (used as defaults)
pub const ENDPOINT_URL: &str = "https://query.wikidata.org/sparql";
pub const DB_PATH: &str = "wikidata_websites4.db";
pub const DEFAULT_MAX_RECORDS: usize = 400_000;
pub const DEFAULT_PAGE_SIZE: usize = 50_000;
pub const DEFAULT_ENRICH_BATCH: usize = 10_000;

/// Per-request timeout. Large SPARQL pages routinely take minutes on the public endpoint.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// User-Agent sent to the query service.
///
/// The Wikidata query service rejects generic agents; it asks for a name and a
/// way to contact the operator.
pub const DEFAULT_USER_AGENT: &str =
    "wikidata_sites/0.1 (batch harvester; contact: operator via --user-agent)";

// Retry strategy
/// Attempts per offset before it is abandoned
pub const RETRY_MAX_ATTEMPTS: usize = 5;
/// Wait after the first failed attempt; doubled on each further failure
pub const RETRY_BACKOFF_BASE_SECS: u64 = 5;
/// Failed attempt after which the page size is halved
pub const RETRY_SHRINK_AFTER_ATTEMPT: usize = 2;
/// Pages at or below this size are never halved
pub const RETRY_SHRINK_FLOOR: usize = 5_000;

/// Logging level for the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, VariantNamesMacro)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: One JSON object per line for machine parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, VariantNamesMacro)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    Plain,
    Json,
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Harvest every category into the default database
/// wikidata_sites harvest
///
/// # Smaller pages, only two categories
/// wikidata_sites harvest sites.db --batch 20000 --category Bank --category Airline
///
/// # Backfill domain columns
/// wikidata_sites enrich sites.db --batch 5000
/// ```
#[derive(Debug, StructOpt)]
#[structopt(
    name = "wikidata_sites",
    about = "Harvests official websites of Wikidata organisations into SQLite."
)]
pub struct Opt {
    /// Log level: error|warn|info|debug|trace
    #[structopt(long, global = true, default_value = "info", possible_values = LogLevel::VARIANTS, case_insensitive = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[structopt(long, global = true, default_value = "plain", possible_values = LogFormat::VARIANTS, case_insensitive = true)]
    pub log_format: LogFormat,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Fetch every category from the query service into the database
    Harvest(HarvestOpt),
    /// Fill the domain and subdomain columns for rows not yet processed
    Enrich(EnrichOpt),
    /// Print row counts and enrichment progress
    Status(StatusOpt),
}

#[derive(Debug, StructOpt)]
pub struct HarvestOpt {
    /// SQLite destination path
    #[structopt(parse(from_os_str), default_value = DB_PATH)]
    pub outfile: PathBuf,

    /// Max rows per category
    #[structopt(long = "max", default_value = "400000")]
    pub max_records: usize,

    /// Page size per query
    #[structopt(long = "batch", default_value = "50000")]
    pub batch_size: usize,

    /// Only harvest these category labels (repeatable, case-insensitive)
    #[structopt(long = "category")]
    pub categories: Vec<String>,

    /// SPARQL endpoint
    #[structopt(long, default_value = ENDPOINT_URL)]
    pub endpoint: String,

    /// HTTP User-Agent header value
    #[structopt(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[structopt(long, default_value = "300")]
    pub timeout_seconds: u64,

    /// Attempts per page before the offset is skipped
    #[structopt(long, default_value = "5")]
    pub max_retries: usize,

    /// Wait after the first failed attempt, in seconds (doubles per attempt)
    #[structopt(long, default_value = "5")]
    pub backoff_base_secs: u64,
}

#[derive(Debug, StructOpt)]
pub struct EnrichOpt {
    /// SQLite database path
    #[structopt(parse(from_os_str), default_value = DB_PATH)]
    pub db: PathBuf,

    /// Rows selected and updated per transaction
    #[structopt(long = "batch", default_value = "10000")]
    pub batch_size: usize,
}

#[derive(Debug, StructOpt)]
pub struct StatusOpt {
    /// SQLite database path
    #[structopt(parse(from_os_str), default_value = DB_PATH)]
    pub db: PathBuf,
}

/// Retry policy applied to every page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub backoff_base: Duration,
    pub shrink_after_attempt: usize,
    pub shrink_floor: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: RETRY_MAX_ATTEMPTS,
            backoff_base: Duration::from_secs(RETRY_BACKOFF_BASE_SECS),
            shrink_after_attempt: RETRY_SHRINK_AFTER_ATTEMPT,
            shrink_floor: RETRY_SHRINK_FLOOR,
        }
    }
}

/// Library configuration for a harvest run.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub db_path: PathBuf,
    pub endpoint: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub max_records: usize,
    pub page_size: usize,
    pub categories: Vec<Category>,
    pub retry: RetryPolicy,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        HarvestConfig {
            db_path: PathBuf::from(DB_PATH),
            endpoint: ENDPOINT_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_records: DEFAULT_MAX_RECORDS,
            page_size: DEFAULT_PAGE_SIZE,
            categories: categories::CATEGORIES.to_vec(),
            retry: RetryPolicy::default(),
        }
    }
}

impl HarvestConfig {
    /// Rejects settings that would make the fetch loop spin or never start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_records == 0 {
            return Err(ConfigError::ZeroValue("--max"));
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroValue("--batch"));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ZeroValue("--max-retries"));
        }
        url::Url::parse(&self.endpoint)
            .map_err(|e| ConfigError::InvalidEndpoint(self.endpoint.clone(), e))?;
        Ok(())
    }
}

impl TryFrom<HarvestOpt> for HarvestConfig {
    type Error = ConfigError;

    fn try_from(opt: HarvestOpt) -> Result<Self, Self::Error> {
        let categories = if opt.categories.is_empty() {
            categories::CATEGORIES.to_vec()
        } else {
            opt.categories
                .iter()
                .map(|label| {
                    categories::find(label)
                        .copied()
                        .ok_or_else(|| ConfigError::UnknownCategory(label.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let config = HarvestConfig {
            db_path: opt.outfile,
            endpoint: opt.endpoint,
            user_agent: opt.user_agent,
            timeout: Duration::from_secs(opt.timeout_seconds),
            max_records: opt.max_records,
            page_size: opt.batch_size,
            categories,
            retry: RetryPolicy {
                max_attempts: opt.max_retries,
                backoff_base: Duration::from_secs(opt.backoff_base_secs),
                ..RetryPolicy::default()
            },
        };
        config.validate()?;
        Ok(config)
    }
}

/// Library configuration for an enrichment run.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    pub db_path: PathBuf,
    pub batch_size: usize,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        EnrichConfig {
            db_path: PathBuf::from(DB_PATH),
            batch_size: DEFAULT_ENRICH_BATCH,
        }
    }
}

impl EnrichConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroValue("--batch"));
        }
        Ok(())
    }
}

impl TryFrom<EnrichOpt> for EnrichConfig {
    type Error = ConfigError;

    fn try_from(opt: EnrichOpt) -> Result<Self, Self::Error> {
        let config = EnrichConfig {
            db_path: opt.db,
            batch_size: opt.batch_size,
        };
        config.validate()?;
        Ok(config)
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use wikiart_dataset::config::{
    CrawlCliConfig, CrawlConfig, FileConfig, DEFAULT_BASE_URL, DEFAULT_DATASET_DIR,
    DEFAULT_EXCLUDED_ERA, DEFAULT_LEDGER_PATH, DEFAULT_MAX_PAINTINGS_PER_ARTIST,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use wikiart_dataset::logging::init_logging;
use wikiart_dataset::taxonomy::{HttpPageFetcher, PageFetcher, TaxonomyWalker};
use wikiart_dataset::{parse_path, run_crawl, version_line, Acquirer, LedgerWriter};

#[derive(Parser, Debug)]
#[command(version, about = "Crawl the art-movement taxonomy into a local corpus")]
struct CliArgs {
    /// Path to a TOML config file. Values there override command line flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Site root.
    #[clap(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory the images are downloaded into.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_DATASET_DIR)]
    pub dataset_dir: PathBuf,

    /// Where the corpus ledger is written.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_LEDGER_PATH)]
    pub ledger: PathBuf,

    #[clap(long, default_value_t = DEFAULT_MAX_PAINTINGS_PER_ARTIST)]
    pub max_paintings_per_artist: usize,

    /// HTTP request timeout in seconds.
    #[clap(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout_sec: u64,

    /// Minimum delay between two requests, in milliseconds.
    #[clap(long, default_value_t = 0)]
    pub request_interval_ms: u64,

    /// Only walk this era. Repeat for several.
    #[clap(long = "era")]
    pub eras: Vec<String>,

    /// Skip this era unless it is also passed to --era. Repeat for several.
    #[clap(long = "exclude-era", default_value = DEFAULT_EXCLUDED_ERA)]
    pub excluded_eras: Vec<String>,

    /// Also write logs to a timestamped file in this directory.
    #[clap(long, value_parser = parse_path)]
    pub log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let log_dir = file_config
        .as_ref()
        .and_then(|f| f.log_dir.clone())
        .map(PathBuf::from)
        .or_else(|| cli_args.log_dir.clone());
    if let Some(log_path) = init_logging(log_dir.as_deref())? {
        info!("Logging to {:?}", log_path);
    }
    info!("{}", version_line("wikiart-scrape"));

    let cli_config = CrawlCliConfig {
        base_url: cli_args.base_url.clone(),
        dataset_dir: cli_args.dataset_dir.clone(),
        ledger_path: cli_args.ledger.clone(),
        max_paintings_per_artist: cli_args.max_paintings_per_artist,
        request_timeout_secs: cli_args.timeout_sec,
        request_interval_ms: cli_args.request_interval_ms,
        era_filter: cli_args.eras.clone(),
        excluded_eras: cli_args.excluded_eras.clone(),
    };
    let config = CrawlConfig::resolve(&cli_config, file_config.as_ref())?;

    info!(
        "Crawling {} into {:?}, ledger {:?}",
        config.root_url, config.dataset_dir, config.ledger_path
    );
    let fetcher: Arc<dyn PageFetcher> = Arc::new(
        HttpPageFetcher::new(
            &config.user_agent,
            config.request_timeout,
            config.request_interval,
        )
        .context("Failed to create HTTP client")?,
    );
    let acquirer = Acquirer::new(fetcher.clone(), &config.dataset_dir);
    let walker = TaxonomyWalker::new(fetcher, acquirer, config.walker_settings());
    let writer = LedgerWriter::new(&config.ledger_path);

    let summary = run_crawl(&walker, &writer)?;
    info!(
        "{} rows written; {} paintings downloaded ({} bytes), {} already present, {} nodes skipped",
        summary.rows_flushed,
        summary.report.paintings_downloaded,
        summary.report.bytes_downloaded,
        summary.report.paintings_already_present,
        summary.report.node_failures
    );
    Ok(())
}

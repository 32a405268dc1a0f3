use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tracing::{info, warn};

use wikiart_dataset::config::{CurationCliConfig, CurationConfig, FileConfig};
use wikiart_dataset::curation::{filter_label_purity, CategoryRanker, Curator};
use wikiart_dataset::logging::init_logging;
use wikiart_dataset::{parse_path, read_ledger, version_line};

#[derive(Parser, Debug)]
#[command(version, about = "Rank the crawled corpus and build train/validate crops")]
struct CliArgs {
    /// Path to a TOML config file. Values there override command line flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Corpus ledger written by the crawl.
    #[clap(long, value_parser = parse_path)]
    pub csv: Option<PathBuf>,

    /// Directory holding the crawled source images.
    #[clap(long, value_parser = parse_path)]
    pub path: Option<PathBuf>,

    /// Filter and rank the corpus.
    #[clap(short, long)]
    pub fetch: bool,

    /// Sample and write a new train/validate set.
    #[clap(long)]
    pub new_trainset: bool,

    /// Train images per target movement.
    #[clap(long)]
    pub train: Option<usize>,

    /// Validate images per target movement.
    #[clap(long)]
    pub validate: Option<usize>,

    /// Root directory of the train/ and validate/ output.
    #[clap(long, value_parser = parse_path)]
    pub dataset_root: Option<PathBuf>,

    /// Seed for reproducible sampling.
    #[clap(long)]
    pub seed: Option<u64>,

    /// Also write logs to a timestamped file in this directory.
    #[clap(long, value_parser = parse_path)]
    pub log_dir: Option<PathBuf>,
}

impl CliArgs {
    /// Ledger and source directory, both needed by every mode.
    fn sources(&self) -> Option<(PathBuf, PathBuf)> {
        self.csv.clone().zip(self.path.clone())
    }

    /// Building needs the ranking, so it also needs the fetch inputs.
    fn build_counts(&self) -> Option<(usize, usize)> {
        if !self.new_trainset {
            return None;
        }
        self.train.zip(self.validate)
    }

    /// Sources of the requested run, or `None` when no mode has its inputs.
    fn requested_sources(&self) -> Option<(PathBuf, PathBuf)> {
        if !self.fetch && self.build_counts().is_none() {
            return None;
        }
        self.sources()
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let build = cli_args.build_counts();
    let Some((csv, source_path)) = cli_args.requested_sources() else {
        CliArgs::command().print_help()?;
        println!();
        return Ok(());
    };

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
    info!("{}", version_line("dataset-builder"));

    let config = CurationConfig::resolve(
        &CurationCliConfig {
            dataset_root: cli_args.dataset_root.clone(),
            seed: cli_args.seed,
        },
        file_config.as_ref(),
    )?;

    info!("Reading ledger {:?}", csv);
    let rows = read_ledger(&csv).with_context(|| format!("Failed to read ledger {:?}", csv))?;
    info!("{} ledger rows", rows.len());
    let rows = filter_label_purity(rows);

    let ranker = CategoryRanker::new(
        &source_path,
        config.image_extension.as_str(),
        config.candidate_movements,
        config.top_movements,
    );
    let buckets = ranker.fetch(&rows).context("Failed to rank movements")?;

    if let Some((train_n, validate_n)) = build {
        info!(
            "Building dataset in {:?}: {} train and {} validate images per movement",
            config.dataset_root, train_n, validate_n
        );
        let curator = Curator::new(
            &config.dataset_root,
            config.image_extension.as_str(),
            config.target_movements.clone(),
            config.train_crop,
            config.validate_crop,
            config.seed,
        );
        let outcome = curator.curate(train_n, validate_n, &buckets, &source_path);

        for (movement, reason) in &outcome.assignment.skipped {
            warn!("{} not built: {}", movement, reason);
        }
        info!(
            "train: {} written, {} failed; validate: {} written, {} failed",
            outcome.report.train.written,
            outcome.report.train.failed,
            outcome.report.validate.written,
            outcome.report.validate.failed
        );
    }

    Ok(())
}

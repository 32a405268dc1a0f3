mod file_config;

pub use file_config::{CrawlFileConfig, CurationFileConfig, FileConfig};

use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

use crate::acquisition::IMAGE_EXTENSION;
use crate::taxonomy::{EraTable, WalkerSettings};

pub const DEFAULT_BASE_URL: &str = "https://www.wikiart.org";
pub const DEFAULT_ROOT_PATH: &str = "/en/artists-by-art-movement";
pub const DEFAULT_DATASET_DIR: &str = "dataset";
pub const DEFAULT_LEDGER_PATH: &str = "dataset.csv";
pub const DEFAULT_MAX_PAINTINGS_PER_ARTIST: usize = 200;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Walked only when named in the era filter.
pub const DEFAULT_EXCLUDED_ERA: &str = "Contemporary Art";

pub const DEFAULT_TRAIN_CROP: u32 = 264;
pub const DEFAULT_VALIDATE_CROP: u32 = 50;
pub const DEFAULT_CANDIDATE_MOVEMENTS: usize = 20;
pub const DEFAULT_TOP_MOVEMENTS: usize = 10;
pub const DEFAULT_TARGET_MOVEMENTS: [&str; 5] = [
    "cubism",
    "impressionism",
    "symbolism",
    "postpainterly_abstraction",
    "postimpressionism",
];

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Crawl arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CrawlCliConfig {
    pub base_url: String,
    pub dataset_dir: PathBuf,
    pub ledger_path: PathBuf,
    pub max_paintings_per_artist: usize,
    pub request_timeout_secs: u64,
    pub request_interval_ms: u64,
    pub era_filter: Vec<String>,
    pub excluded_eras: Vec<String>,
}

impl Default for CrawlCliConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            dataset_dir: PathBuf::from(DEFAULT_DATASET_DIR),
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            max_paintings_per_artist: DEFAULT_MAX_PAINTINGS_PER_ARTIST,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            request_interval_ms: 0,
            era_filter: Vec::new(),
            excluded_eras: vec![DEFAULT_EXCLUDED_ERA.to_string()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub base_url: Url,
    pub root_url: Url,
    pub dataset_dir: PathBuf,
    pub ledger_path: PathBuf,
    pub max_paintings_per_artist: usize,
    pub request_timeout: Duration,
    /// Minimum spacing between requests. Zero disables spacing.
    pub request_interval: Duration,
    pub user_agent: String,
    pub era_filter: Vec<String>,
    pub excluded_eras: Vec<String>,
    pub era_table: EraTable,
}

impl CrawlConfig {
    /// Resolve crawl configuration from CLI arguments and optional TOML file
    /// config. TOML values override CLI values where present.
    pub fn resolve(cli: &CrawlCliConfig, file_config: Option<&FileConfig>) -> Result<Self> {
        let file = file_config
            .and_then(|f| f.crawl.clone())
            .unwrap_or_default();

        let base_url_str = file.base_url.unwrap_or_else(|| cli.base_url.clone());
        let base_url = Url::parse(&base_url_str)
            .with_context(|| format!("Invalid base_url: {}", base_url_str))?;
        let root_path = file
            .root_path
            .unwrap_or_else(|| DEFAULT_ROOT_PATH.to_string());
        let root_url = base_url
            .join(&root_path)
            .with_context(|| format!("Invalid root_path: {}", root_path))?;

        let dataset_dir = file
            .dataset_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.dataset_dir.clone());
        let ledger_path = file
            .ledger_path
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.ledger_path.clone());

        let max_paintings_per_artist = file
            .max_paintings_per_artist
            .unwrap_or(cli.max_paintings_per_artist);
        if max_paintings_per_artist == 0 {
            bail!("max_paintings_per_artist must be greater than zero");
        }

        let request_timeout = Duration::from_secs(
            file.request_timeout_secs
                .unwrap_or(cli.request_timeout_secs),
        );
        let request_interval = Duration::from_millis(
            file.request_interval_ms
                .unwrap_or(cli.request_interval_ms),
        );
        let user_agent = file.user_agent.unwrap_or_else(default_user_agent);

        let era_filter = file
            .era_filter
            .unwrap_or_else(|| cli.era_filter.clone());
        let excluded_eras = file
            .excluded_eras
            .unwrap_or_else(|| cli.excluded_eras.clone());
        let era_table = match file.eras {
            Some(ranges) => EraTable::new(ranges).context("Invalid era table")?,
            None => EraTable::default(),
        };
        for era in &era_filter {
            if era_table.range_for(era).is_none() {
                bail!("Unknown era in filter: {}", era);
            }
        }

        Ok(Self {
            base_url,
            root_url,
            dataset_dir,
            ledger_path,
            max_paintings_per_artist,
            request_timeout,
            request_interval,
            user_agent,
            era_filter,
            excluded_eras,
            era_table,
        })
    }

    pub fn walker_settings(&self) -> WalkerSettings {
        WalkerSettings {
            base_url: self.base_url.clone(),
            root_url: self.root_url.clone(),
            max_paintings_per_artist: self.max_paintings_per_artist,
            era_filter: self.era_filter.clone(),
            excluded_eras: self.excluded_eras.clone(),
            eras: self.era_table.clone(),
        }
    }
}

/// Curation arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CurationCliConfig {
    pub dataset_root: Option<PathBuf>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct CurationConfig {
    pub dataset_root: PathBuf,
    pub image_extension: String,
    pub target_movements: Vec<String>,
    pub train_crop: u32,
    pub validate_crop: u32,
    pub candidate_movements: usize,
    pub top_movements: usize,
    pub seed: Option<u64>,
}

impl CurationConfig {
    /// Resolve curation configuration from CLI arguments and optional TOML
    /// file config. TOML values override CLI values where present.
    pub fn resolve(cli: &CurationCliConfig, file_config: Option<&FileConfig>) -> Result<Self> {
        let file = file_config
            .and_then(|f| f.curation.clone())
            .unwrap_or_default();

        let dataset_root = file
            .dataset_root
            .map(PathBuf::from)
            .or_else(|| cli.dataset_root.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_DIR));

        let image_extension = file
            .image_extension
            .unwrap_or_else(|| IMAGE_EXTENSION.to_string());
        if !image_extension.starts_with('.') {
            bail!("image_extension must start with '.': {}", image_extension);
        }

        let target_movements = file.target_movements.unwrap_or_else(|| {
            DEFAULT_TARGET_MOVEMENTS
                .iter()
                .map(|m| m.to_string())
                .collect()
        });
        if target_movements.is_empty() {
            bail!("target_movements must not be empty");
        }

        let train_crop = file.train_crop.unwrap_or(DEFAULT_TRAIN_CROP);
        let validate_crop = file.validate_crop.unwrap_or(DEFAULT_VALIDATE_CROP);
        if train_crop == 0 || validate_crop == 0 {
            bail!("Crop sizes must be greater than zero");
        }

        Ok(Self {
            dataset_root,
            image_extension,
            target_movements,
            train_crop,
            validate_crop,
            candidate_movements: file
                .candidate_movements
                .unwrap_or(DEFAULT_CANDIDATE_MOVEMENTS),
            top_movements: file.top_movements.unwrap_or(DEFAULT_TOP_MOVEMENTS),
            seed: file.seed.or(cli.seed),
        })
    }
}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::taxonomy::EraRange;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub log_dir: Option<String>,

    pub crawl: Option<CrawlFileConfig>,
    pub curation: Option<CurationFileConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct CrawlFileConfig {
    pub base_url: Option<String>,
    /// Path of the root listing, relative to `base_url`.
    pub root_path: Option<String>,
    pub dataset_dir: Option<String>,
    pub ledger_path: Option<String>,
    pub max_paintings_per_artist: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub request_interval_ms: Option<u64>,
    pub user_agent: Option<String>,
    pub era_filter: Option<Vec<String>>,
    /// Eras skipped unless named in `era_filter`. An empty list walks all.
    pub excluded_eras: Option<Vec<String>>,
    /// Replaces the built-in era table when present.
    pub eras: Option<Vec<EraRange>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct CurationFileConfig {
    pub dataset_root: Option<String>,
    pub image_extension: Option<String>,
    pub target_movements: Option<Vec<String>>,
    pub train_crop: Option<u32>,
    pub validate_crop: Option<u32>,
    pub candidate_movements: Option<usize>,
    pub top_movements: Option<usize>,
    pub seed: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
log_dir = "/var/log/wikiart"

[crawl]
base_url = "https://mirror.example.org"
max_paintings_per_artist = 50
request_interval_ms = 250
era_filter = ["Modern Art"]

[[crawl.eras]]
name = "Modern Art"
first = 0
last = 3

[curation]
target_movements = ["cubism", "fauvism"]
train_crop = 128
seed = 42
"#
        )
        .unwrap();

        let config = FileConfig::load(file.path()).unwrap();
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/wikiart"));

        let crawl = config.crawl.unwrap();
        assert_eq!(crawl.base_url.as_deref(), Some("https://mirror.example.org"));
        assert_eq!(crawl.max_paintings_per_artist, Some(50));
        assert_eq!(crawl.request_interval_ms, Some(250));
        assert_eq!(crawl.eras, Some(vec![EraRange::new("Modern Art", 0, 3)]));
        assert!(crawl.dataset_dir.is_none());

        let curation = config.curation.unwrap();
        assert_eq!(
            curation.target_movements,
            Some(vec!["cubism".to_string(), "fauvism".to_string()])
        );
        assert_eq!(curation.train_crop, Some(128));
        assert_eq!(curation.seed, Some(42));
        assert!(curation.validate_crop.is_none());
    }

    #[test]
    fn test_load_empty_config() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = FileConfig::load(file.path()).unwrap();
        assert!(config.log_dir.is_none());
        assert!(config.crawl.is_none());
        assert!(config.curation.is_none());
    }

    #[test]
    fn test_load_invalid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[crawl\nbase_url = 1").unwrap();
        let err = FileConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}

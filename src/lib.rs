//! WikiArt dataset tooling.
//!
//! Crawls the art-movement taxonomy into a local image corpus and a CSV
//! ledger, then curates stratified train/validate crops from it.

pub mod acquisition;
pub mod config;
pub mod crawl;
pub mod curation;
pub mod image_store;
pub mod ledger;
pub mod logging;
pub mod taxonomy;

pub use acquisition::{Acquirer, AcquisitionError};
pub use crawl::{run_crawl, CrawlError, CrawlSummary};
pub use curation::{CategoryRanker, CurationError, Curator, MovementBucket, SplitAssignment};
pub use ledger::{read_ledger, CorpusLedger, LedgerWriter, PaintingRecord};
pub use taxonomy::{HttpPageFetcher, PageFetcher, TaxonomyWalker};

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Make `s` an absolute path, resolved against the current directory when
/// relative. Paths that do not exist yet are accepted.
pub fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

/// `<name> <version> (<git hash>)` line logged at startup.
pub fn version_line(binary: &str) -> String {
    format!(
        "{} {} ({})",
        binary,
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    )
}

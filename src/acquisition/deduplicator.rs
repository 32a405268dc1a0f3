//! Skip-if-present painting acquisition.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::Url;
use tracing::debug;

use super::error::AcquisitionError;
use super::paths::{image_path, local_id, IMAGE_EXTENSION};
use crate::taxonomy::{parser, PageFetcher};

/// How a painting slot came to be present locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// A file already existed at the expected path; nothing was fetched.
    AlreadyPresent,
    /// The image was fetched and written; carries the number of bytes written.
    Downloaded(u64),
}

/// Decides per painting slot whether a fetch is needed and performs it.
///
/// A slot is `(movement_dir, artist slug, index)`. At most one file is ever
/// written per slot: once a file exists at the slot's path, later calls
/// return [`AcquireOutcome::AlreadyPresent`] without touching the network.
pub struct Acquirer {
    fetcher: Arc<dyn PageFetcher>,
    dataset_dir: PathBuf,
}

impl Acquirer {
    pub fn new(fetcher: Arc<dyn PageFetcher>, dataset_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            dataset_dir: dataset_dir.into(),
        }
    }

    pub fn dataset_dir(&self) -> &Path {
        &self.dataset_dir
    }

    /// Expected local file for a painting slot.
    pub fn expected_path(&self, movement_dir: &str, artist_name: &str, index: usize) -> PathBuf {
        image_path(
            &self.dataset_dir,
            &local_id(movement_dir, artist_name, index),
            IMAGE_EXTENSION,
        )
    }

    /// Make sure the painting slot has a local file.
    ///
    /// On error nothing is left at the expected path, so the caller can retry
    /// the same index with the next painting.
    pub fn acquire(
        &self,
        movement_dir: &str,
        artist_name: &str,
        painting_link: &Url,
        index: usize,
    ) -> Result<AcquireOutcome, AcquisitionError> {
        let path = self.expected_path(movement_dir, artist_name, index);
        if path.is_file() {
            debug!("Already present: {:?}", path);
            return Ok(AcquireOutcome::AlreadyPresent);
        }

        let detail_page = self.fetcher.fetch_text(painting_link)?;
        let image_url = parser::parse_primary_image(&detail_page, painting_link)?;
        let bytes = self.fetcher.fetch_bytes(&image_url)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| AcquisitionError::io(parent, e))?;
        }

        // Write beside the target and rename, so an interrupted write never
        // leaves a file that would later count as present.
        let partial = path.with_extension("jpg.part");
        fs::write(&partial, &bytes).map_err(|e| AcquisitionError::io(&partial, e))?;
        if let Err(e) = fs::rename(&partial, &path) {
            let _ = fs::remove_file(&partial);
            return Err(AcquisitionError::io(&path, e));
        }

        debug!("Downloaded {} bytes to {:?}", bytes.len(), path);
        Ok(AcquireOutcome::Downloaded(bytes.len() as u64))
    }
}

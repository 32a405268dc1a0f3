//! Writes the sampled splits to disk as center crops.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::sampler::SplitAssignment;
use super::CurationError;
use crate::acquisition::image_path;
use crate::image_store;

/// One output split of the curated dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Validate,
}

impl Split {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Validate => "validate",
        }
    }
}

/// Written and failed counts for one split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    pub written: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurationReport {
    pub train: SplitReport,
    pub validate: SplitReport,
    /// Directories that could not be reset.
    pub reset_failures: usize,
}

/// Paths and crop windows of a materialization run.
#[derive(Debug, Clone)]
pub struct Materializer {
    source_dir: PathBuf,
    dataset_root: PathBuf,
    extension: String,
    train_crop: u32,
    validate_crop: u32,
}

impl Materializer {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        dataset_root: impl Into<PathBuf>,
        extension: impl Into<String>,
        train_crop: u32,
        validate_crop: u32,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            dataset_root: dataset_root.into(),
            extension: extension.into(),
            train_crop,
            validate_crop,
        }
    }

    pub fn split_dir(&self, split: Split) -> PathBuf {
        self.dataset_root.join(split.dir_name())
    }

    fn window(&self, split: Split) -> u32 {
        match split {
            Split::Train => self.train_crop,
            Split::Validate => self.validate_crop,
        }
    }

    /// Remove and recreate `<root>/<split>/<movement>`.
    pub fn reset_movement_dir(&self, split: Split, movement: &str) -> Result<(), CurationError> {
        let dir = self.split_dir(split).join(movement);
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|source| CurationError::Io {
                path: dir.clone(),
                source,
            })?;
        }
        fs::create_dir_all(&dir).map_err(|source| CurationError::Io { path: dir, source })
    }

    /// Reset both split directories of every movement, each independently of
    /// the others. Returns the number of directories that failed.
    pub fn reset<'a>(&self, movements: impl IntoIterator<Item = &'a str>) -> usize {
        let mut failures = 0;
        for movement in movements {
            for split in [Split::Train, Split::Validate] {
                if let Err(e) = self.reset_movement_dir(split, movement) {
                    warn!("Could not reset {} directory of {}: {}", split.dir_name(), movement, e);
                    failures += 1;
                }
            }
        }
        failures
    }

    /// Crop one image into `split`. Returns the output path.
    pub fn write_crop(&self, split: Split, id: &str) -> Result<PathBuf, CurationError> {
        let src = image_path(&self.source_dir, id, &self.extension);
        let dst = image_path(&self.split_dir(split), id, &self.extension);
        let (width, height) = image_store::crop_to_file(&src, &dst, self.window(split))?;
        debug!("{} {}x{} -> {:?}", id, width, height, dst);
        Ok(dst)
    }

    fn write_split<'a>(
        &self,
        split: Split,
        ids: impl IntoIterator<Item = &'a String>,
    ) -> SplitReport {
        let mut report = SplitReport::default();
        for id in ids {
            match self.write_crop(split, id) {
                Ok(_) => report.written += 1,
                Err(e) => {
                    warn!("Could not write {} crop of {}: {}", split.dir_name(), id, e);
                    report.failed += 1;
                }
            }
        }
        info!(
            "{}: {} crops written, {} failed",
            split.dir_name(),
            report.written,
            report.failed
        );
        report
    }

    /// Reset the target directories, then write every assigned crop.
    ///
    /// `targets` are reset even when sampling skipped them, so a rerun never
    /// leaves stale crops behind. Failures are per image and never abort the
    /// run.
    pub fn materialize(&self, targets: &[String], assignment: &SplitAssignment) -> CurationReport {
        let reset_failures = self.reset(targets.iter().map(String::as_str));

        let train = self.write_split(Split::Train, assignment.train.values().flatten());
        let validate = self.write_split(Split::Validate, assignment.validate.values().flatten());

        CurationReport {
            train,
            validate,
            reset_failures,
        }
    }

    pub fn dataset_root(&self) -> &Path {
        &self.dataset_root
    }
}

//! Dataset curation: label-purity filter, category ranking, stratified
//! sampling and crop materialization.

mod materialize;
mod purity;
mod ranker;
mod sampler;

use std::io;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::info;

use crate::image_store::ImageStoreError;
use crate::ledger::LedgerError;

pub use materialize::{CurationReport, Materializer, Split, SplitReport};
pub use purity::{ambiguous_authors, filter_label_purity};
pub use ranker::{
    candidate_movements, rank, select_best_era, CategoryRanker, MovementBucket, MovementSurvey,
    SizeStatistics,
};
pub use sampler::{assign_splits, split_pool, SamplingPool, SplitAssignment};

#[derive(Debug, Error)]
pub enum CurationError {
    #[error("Movement {movement} has {available} valid images, {requested} requested")]
    PoolExhausted {
        movement: String,
        requested: usize,
        available: usize,
    },

    #[error("Movement {movement} is not among the ranked movements")]
    UnknownMovement { movement: String },

    #[error("Corpus is empty")]
    EmptyCorpus,

    #[error(transparent)]
    ImageStore(#[from] ImageStoreError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of one curation run.
#[derive(Debug, Clone)]
pub struct CurationOutcome {
    pub assignment: SplitAssignment,
    pub report: CurationReport,
}

/// Samples the target movements and writes the train/validate crops.
#[derive(Debug, Clone)]
pub struct Curator {
    dataset_root: PathBuf,
    extension: String,
    targets: Vec<String>,
    train_crop: u32,
    validate_crop: u32,
    seed: Option<u64>,
}

impl Curator {
    pub fn new(
        dataset_root: impl Into<PathBuf>,
        extension: impl Into<String>,
        targets: Vec<String>,
        train_crop: u32,
        validate_crop: u32,
        seed: Option<u64>,
    ) -> Self {
        Self {
            dataset_root: dataset_root.into(),
            extension: extension.into(),
            targets,
            train_crop,
            validate_crop,
            seed,
        }
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Draw `train_n` and `validate_n` images per target movement from
    /// `buckets` and write their crops under the dataset root. Source images
    /// are read from `source_path`.
    pub fn curate(
        &self,
        train_n: usize,
        validate_n: usize,
        buckets: &[MovementBucket],
        source_path: &Path,
    ) -> CurationOutcome {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.curate_with_rng(train_n, validate_n, buckets, source_path, &mut rng)
    }

    pub fn curate_with_rng<R: Rng>(
        &self,
        train_n: usize,
        validate_n: usize,
        buckets: &[MovementBucket],
        source_path: &Path,
        rng: &mut R,
    ) -> CurationOutcome {
        let assignment = assign_splits(buckets, &self.targets, train_n, validate_n, rng);

        let materializer = Materializer::new(
            source_path,
            &self.dataset_root,
            self.extension.as_str(),
            self.train_crop,
            self.validate_crop,
        );
        let report = materializer.materialize(&self.targets, &assignment);

        info!(
            "Curation done: {} movements assigned, {} skipped, {} train / {} validate crops written",
            assignment.train.len(),
            assignment.skipped.len(),
            report.train.written,
            report.validate.written
        );
        CurationOutcome { assignment, report }
    }
}

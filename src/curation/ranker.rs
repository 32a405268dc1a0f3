//! Era selection, corpus statistics and movement ranking by valid images.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::CurationError;
use crate::acquisition::image_path;
use crate::image_store::{self, ImageInfo, Orientation};
use crate::ledger::PaintingRecord;

/// A movement paired with its valid image ids, in ledger order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementBucket {
    /// Movement key in directory form.
    pub movement: String,
    pub image_ids: Vec<String>,
}

impl MovementBucket {
    pub fn len(&self) -> usize {
        self.image_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image_ids.is_empty()
    }
}

/// Dimension and encoding statistics over the openable images of a movement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizeStatistics {
    pub opened: usize,
    pub accepted: usize,
    pub min_width: u32,
    pub min_height: u32,
    pub avg_width: f64,
    pub avg_height: f64,
    pub landscape: usize,
    pub portrait: usize,
    pub square: usize,
}

impl SizeStatistics {
    pub fn from_infos<'a>(infos: impl IntoIterator<Item = &'a ImageInfo>) -> Self {
        let mut stats = SizeStatistics::default();
        let (mut sum_width, mut sum_height) = (0u64, 0u64);

        for info in infos {
            if stats.opened == 0 {
                stats.min_width = info.width;
                stats.min_height = info.height;
            } else {
                stats.min_width = stats.min_width.min(info.width);
                stats.min_height = stats.min_height.min(info.height);
            }
            stats.opened += 1;
            sum_width += info.width as u64;
            sum_height += info.height as u64;

            if info.is_accepted() {
                stats.accepted += 1;
            }
            match info.orientation() {
                Orientation::Landscape => stats.landscape += 1,
                Orientation::Portrait => stats.portrait += 1,
                Orientation::Square => stats.square += 1,
            }
        }

        if stats.opened > 0 {
            stats.avg_width = sum_width as f64 / stats.opened as f64;
            stats.avg_height = sum_height as f64 / stats.opened as f64;
        }
        stats
    }
}

/// Probe results for one movement.
#[derive(Debug, Clone)]
pub struct MovementSurvey {
    pub movement: String,
    pub listed: usize,
    pub stats: SizeStatistics,
    /// Ids whose file opened and carries the accepted encoding, in ledger order.
    pub valid_ids: Vec<String>,
}

/// Era with the most distinct movements. Ties go to the era seen first.
pub fn select_best_era(rows: &[PaintingRecord]) -> Option<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut movements: HashMap<&str, HashSet<String>> = HashMap::new();
    for row in rows {
        let seen = movements.entry(row.era.as_str()).or_insert_with(|| {
            order.push(row.era.as_str());
            HashSet::new()
        });
        seen.insert(row.movement_key());
    }

    let mut best: Option<(&str, usize)> = None;
    for era in order {
        let count = movements.get(era).map_or(0, HashSet::len);
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((era, count));
        }
    }
    best.map(|(era, _)| era.to_string())
}

/// Movement keys of `era`, ordered by distinct painting titles (descending,
/// first-seen order on ties) and cut to `limit`.
pub fn candidate_movements(rows: &[PaintingRecord], era: &str, limit: usize) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut titles: HashMap<String, HashSet<&str>> = HashMap::new();
    for row in rows.iter().filter(|r| r.era == era) {
        let key = row.movement_key();
        if !titles.contains_key(&key) {
            order.push(key.clone());
        }
        titles.entry(key).or_default().insert(row.title.as_str());
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|movement| {
            let count = titles.get(&movement).map_or(0, HashSet::len);
            (movement, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let total_titles: usize = ranked.iter().map(|(_, count)| count).sum();
    info!(
        "Era {} has {} movements and {} distinct painting titles",
        era,
        ranked.len(),
        total_titles
    );

    ranked
        .into_iter()
        .take(limit)
        .map(|(movement, _)| movement)
        .collect()
}

/// Rank surveys by valid image count, descending and stable, and keep the
/// first `top_n` as buckets.
pub fn rank(surveys: Vec<MovementSurvey>, top_n: usize) -> Vec<MovementBucket> {
    let mut surveys = surveys;
    surveys.sort_by(|a, b| b.valid_ids.len().cmp(&a.valid_ids.len()));
    surveys
        .into_iter()
        .take(top_n)
        .map(|survey| MovementBucket {
            movement: survey.movement,
            image_ids: survey.valid_ids,
        })
        .collect()
}

/// Scores movements of the best era by how many valid images back them.
pub struct CategoryRanker {
    source_dir: PathBuf,
    extension: String,
    candidate_limit: usize,
    top_n: usize,
}

impl CategoryRanker {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        extension: impl Into<String>,
        candidate_limit: usize,
        top_n: usize,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            extension: extension.into(),
            candidate_limit,
            top_n,
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Probe every image of `movement` once and collect statistics and the
    /// valid ids. Repeated ledger ids are kept once.
    pub fn survey(&self, movement: &str, rows: &[PaintingRecord]) -> MovementSurvey {
        let mut infos = Vec::new();
        let mut valid_ids = Vec::new();
        let mut listed = 0;
        let mut seen = HashSet::new();

        for row in rows.iter().filter(|r| r.movement_key() == movement) {
            listed += 1;
            if !seen.insert(row.local_id.as_str()) {
                debug!("{} listed more than once, keeping the first row", row.local_id);
                continue;
            }
            let path = image_path(&self.source_dir, &row.local_id, &self.extension);
            match image_store::probe(&path) {
                Ok(info) => {
                    if info.is_accepted() {
                        valid_ids.push(row.local_id.clone());
                    } else {
                        debug!("{} has unsupported encoding {:?}", row.local_id, info.color);
                    }
                    infos.push(info);
                }
                Err(e) => debug!("Skipping {}: {}", row.local_id, e),
            }
        }

        let stats = SizeStatistics::from_infos(&infos);
        info!(
            "{}: {} listed, {} opened, {} accepted, min {}x{}, avg {:.1}x{:.1}, {} landscape / {} portrait / {} square",
            movement,
            listed,
            stats.opened,
            stats.accepted,
            stats.min_width,
            stats.min_height,
            stats.avg_width,
            stats.avg_height,
            stats.landscape,
            stats.portrait,
            stats.square
        );

        MovementSurvey {
            movement: movement.to_string(),
            listed,
            stats,
            valid_ids,
        }
    }

    /// Select the best era of a purity-filtered corpus and return its top
    /// movements with their valid image ids.
    pub fn fetch(&self, rows: &[PaintingRecord]) -> Result<Vec<MovementBucket>, CurationError> {
        let era = select_best_era(rows).ok_or(CurationError::EmptyCorpus)?;
        info!("Best era: {}", era);

        let era_rows: Vec<PaintingRecord> = rows.iter().filter(|r| r.era == era).cloned().collect();
        let candidates = candidate_movements(&era_rows, &era, self.candidate_limit);
        let surveys = candidates
            .iter()
            .map(|movement| self.survey(movement, &era_rows))
            .collect();

        let buckets = rank(surveys, self.top_n);
        for (position, bucket) in buckets.iter().enumerate() {
            info!("#{} {} ({} valid images)", position + 1, bucket.movement, bucket.len());
        }
        Ok(buckets)
    }
}

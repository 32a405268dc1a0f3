//! Sequential era -> movement -> artist -> painting traversal.
//!
//! Only the root listing is required: every failure below it (a movement
//! page, an artist page, a painting) is logged, counted, and the walk moves
//! on to the next sibling.

use std::collections::HashSet;
use std::sync::Arc;

use reqwest::Url;
use tracing::{debug, info, warn};

use super::era_table::EraTable;
use super::fetcher::PageFetcher;
use super::models::{CategoryNode, PaintingLink, RootListing};
use super::parser;
use crate::acquisition::{
    artist_slug, local_id, movement_dir_label, movement_display_label, AcquireOutcome, Acquirer,
    AcquisitionError,
};
use crate::ledger::{CorpusLedger, PaintingRecord};

/// Traversal parameters.
#[derive(Debug, Clone)]
pub struct WalkerSettings {
    /// Site root that relative links on every page are resolved against.
    pub base_url: Url,
    /// Page listing all movements and era headers.
    pub root_url: Url,
    pub max_paintings_per_artist: usize,
    /// When non-empty, only these eras are walked.
    pub era_filter: Vec<String>,
    /// Skipped unless named in `era_filter`.
    pub excluded_eras: Vec<String>,
    pub eras: EraTable,
}

/// Counters collected over one walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub eras_visited: usize,
    pub movements_visited: usize,
    pub artists_visited: usize,
    pub paintings_recorded: usize,
    pub paintings_downloaded: usize,
    pub paintings_already_present: usize,
    pub bytes_downloaded: u64,
    /// Nodes (pages or paintings) skipped because of an error.
    pub node_failures: usize,
}

pub struct TaxonomyWalker {
    fetcher: Arc<dyn PageFetcher>,
    acquirer: Acquirer,
    settings: WalkerSettings,
}

impl TaxonomyWalker {
    pub fn new(fetcher: Arc<dyn PageFetcher>, acquirer: Acquirer, settings: WalkerSettings) -> Self {
        Self {
            fetcher,
            acquirer,
            settings,
        }
    }

    /// Fetch and parse the root listing. Failure here is fatal to the walk.
    pub fn list_root(&self) -> Result<RootListing, AcquisitionError> {
        let html = self.fetcher.fetch_text(&self.settings.root_url)?;
        parser::parse_root_listing(&html, &self.settings.base_url)
    }

    /// Movements of `era` according to the era table, or `None` if the era is
    /// not in the table.
    pub fn movements_for_era<'a>(
        &self,
        era: &str,
        movements: &'a [CategoryNode],
    ) -> Option<&'a [CategoryNode]> {
        self.settings.eras.movements_for(era, movements)
    }

    /// Artists listed on a movement's page, in page order.
    pub fn list_artists(&self, movement: &CategoryNode) -> Result<Vec<CategoryNode>, AcquisitionError> {
        let html = self.fetcher.fetch_text(&movement.link)?;
        parser::parse_artist_listing(&html, &self.settings.base_url, &movement.link)
    }

    /// Painting links listed on an artist's works page, in page order.
    pub fn list_paintings(&self, artist: &CategoryNode) -> Result<Vec<PaintingLink>, AcquisitionError> {
        let html = self.fetcher.fetch_text(&artist.link)?;
        parser::parse_painting_listing(&html, &self.settings.base_url, &artist.link)
    }

    /// An explicit filter decides alone; otherwise every era not excluded.
    pub fn era_selected(&self, era: &str) -> bool {
        let named = |list: &[String]| list.iter().any(|e| e == era);
        if !self.settings.era_filter.is_empty() {
            return named(&self.settings.era_filter);
        }
        !named(&self.settings.excluded_eras)
    }

    /// Walk every selected era on the root listing, appending one ledger row per
    /// painting present locally.
    ///
    /// Rows already appended stay in `ledger` whatever this returns.
    pub fn walk(&self, ledger: &mut CorpusLedger) -> Result<CrawlReport, AcquisitionError> {
        let listing = self.list_root()?;
        info!(
            "Root listing has {} movements under {} eras",
            listing.movements.len(),
            listing.eras.len()
        );

        let mut report = CrawlReport::default();
        for era in &listing.eras {
            if !self.era_selected(era) {
                debug!("Era {} not selected, skipping", era);
                continue;
            }
            let Some(movements) = self.movements_for_era(era, &listing.movements) else {
                warn!("No movement range configured for era '{}', skipping", era);
                continue;
            };

            info!("[+] {}", era.to_uppercase());
            for movement in movements {
                self.walk_movement(era, movement, ledger, &mut report);
            }
            report.eras_visited += 1;
        }

        info!(
            "Crawl finished: {} eras, {} movements, {} artists, {} paintings ({} downloaded, {} already present), {} skipped nodes",
            report.eras_visited,
            report.movements_visited,
            report.artists_visited,
            report.paintings_recorded,
            report.paintings_downloaded,
            report.paintings_already_present,
            report.node_failures
        );
        Ok(report)
    }

    /// Walk one movement. Returns the number of rows appended for it.
    pub fn walk_movement(
        &self,
        era: &str,
        movement: &CategoryNode,
        ledger: &mut CorpusLedger,
        report: &mut CrawlReport,
    ) -> usize {
        let movement_dir = movement_dir_label(&movement.name);
        let artists = match self.list_artists(movement) {
            Ok(artists) => artists,
            Err(e) => {
                warn!(
                    "Skipping artists of {} ({}): {}",
                    movement.name,
                    e.kind().as_str(),
                    e
                );
                report.node_failures += 1;
                Vec::new()
            }
        };
        info!(
            "[+] {} artists listed for {}",
            artists.len(),
            movement_display_label(&movement_dir)
        );

        let mut total = 0;
        let mut seen_slugs = HashSet::new();
        for artist in &artists {
            // a repeated slug would address the same slots twice
            if !seen_slugs.insert(artist_slug(&artist.name)) {
                debug!("{} already walked under {}, skipping", artist.name, movement.name);
                continue;
            }
            let count = self.collect_paintings(era, &movement_dir, artist, ledger, report);
            info!("[{}]\t{}", count, artist.name);
            total += count;
        }
        info!("[+] TOTAL: {}", total);

        report.movements_visited += 1;
        total
    }

    /// Acquire an artist's paintings in page order until the per-artist cap is
    /// reached or the list runs out.
    ///
    /// Indices are dense: a painting that fails to acquire does not consume
    /// one. Returns the number of rows appended.
    pub fn collect_paintings(
        &self,
        era: &str,
        movement_dir: &str,
        artist: &CategoryNode,
        ledger: &mut CorpusLedger,
        report: &mut CrawlReport,
    ) -> usize {
        report.artists_visited += 1;
        let paintings = match self.list_paintings(artist) {
            Ok(paintings) => paintings,
            Err(e) => {
                warn!(
                    "Skipping paintings of {} ({}): {}",
                    artist.name,
                    e.kind().as_str(),
                    e
                );
                report.node_failures += 1;
                return 0;
            }
        };

        let movement_label = movement_display_label(movement_dir);
        let mut index = 0;
        for painting in paintings {
            if index >= self.settings.max_paintings_per_artist {
                break;
            }
            match self
                .acquirer
                .acquire(movement_dir, &artist.name, &painting.link, index)
            {
                Ok(outcome) => {
                    match outcome {
                        AcquireOutcome::AlreadyPresent => report.paintings_already_present += 1,
                        AcquireOutcome::Downloaded(bytes) => {
                            report.paintings_downloaded += 1;
                            report.bytes_downloaded += bytes;
                        }
                    }
                    ledger.append(PaintingRecord::new(
                        local_id(movement_dir, &artist.name, index),
                        era,
                        movement_label.as_str(),
                        artist.name.as_str(),
                        painting.title,
                    ));
                    report.paintings_recorded += 1;
                    index += 1;
                }
                Err(e) => {
                    debug!(
                        "Could not acquire {} ({}): {}",
                        painting.link,
                        e.kind().as_str(),
                        e
                    );
                    report.node_failures += 1;
                }
            }
        }
        index
    }
}

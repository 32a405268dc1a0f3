//! Art-movement taxonomy: page models, era table, markup parsing, fetching
//! and the era -> movement -> artist -> painting walker.

mod era_table;
#[cfg(test)]
pub(crate) mod fake_site;
mod fetcher;
mod models;
pub mod parser;
mod walker;

pub use era_table::{EraRange, EraTable, EraTableError};
pub use fetcher::{HttpPageFetcher, PageFetcher};
pub use models::{CategoryKind, CategoryNode, PaintingLink, RootListing};
pub use walker::{CrawlReport, TaxonomyWalker, WalkerSettings};

//! Common test infrastructure
//!
//! An in-memory art site served through `PageFetcher`, plus image and
//! walker fixtures.

mod constants;
mod fixtures;
mod site;

#[allow(unused_imports)]
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{count_files, jpeg_bytes, walker_for, write_jpeg};
#[allow(unused_imports)]
pub use site::{ArtSiteBuilder, FakeSite};

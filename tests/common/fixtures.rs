use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use reqwest::Url;
use wikiart_dataset::taxonomy::{EraRange, EraTable, PageFetcher, WalkerSettings};
use wikiart_dataset::{Acquirer, TaxonomyWalker};

use super::constants::{BASE_URL, ERA, ROOT_PATH};

/// An RGB JPEG encoded in memory.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([120, 80, 40])));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Jpeg).unwrap();
    buffer.into_inner()
}

#[allow(dead_code)]
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, jpeg_bytes(width, height)).unwrap();
}

/// Number of regular files under `dir`, recursively.
#[allow(dead_code)]
pub fn count_files(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .map(|entry| entry.unwrap().path())
        .map(|path| if path.is_dir() { count_files(&path) } else { 1 })
        .sum()
}

/// Walker over `site` covering `movement_count` movements of the test era.
pub fn walker_for(
    site: Arc<dyn PageFetcher>,
    dataset_dir: &Path,
    movement_count: usize,
    max_paintings_per_artist: usize,
) -> TaxonomyWalker {
    let base = Url::parse(BASE_URL).unwrap();
    let settings = WalkerSettings {
        root_url: base.join(ROOT_PATH).unwrap(),
        base_url: base,
        max_paintings_per_artist,
        era_filter: Vec::new(),
        excluded_eras: Vec::new(),
        eras: EraTable::new(vec![EraRange::new(ERA, 0, movement_count - 1)]).unwrap(),
    };
    TaxonomyWalker::new(site.clone(), Acquirer::new(site, dataset_dir), settings)
}

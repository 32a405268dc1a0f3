use std::collections::HashMap;
use std::sync::Mutex;

use reqwest::Url;
use wikiart_dataset::taxonomy::PageFetcher;
use wikiart_dataset::AcquisitionError;

use super::constants::{BASE_URL, ERA, ROOT_PATH};
use super::fixtures::jpeg_bytes;

/// Site held in memory. Every request is recorded.
#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    blobs: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeSite {
    pub fn insert_page(&mut self, path: &str, html: String) {
        self.pages.insert(format!("{}{}", BASE_URL, path), html);
    }

    pub fn insert_blob(&mut self, path: &str, bytes: Vec<u8>) {
        self.blobs.insert(format!("{}{}", BASE_URL, path), bytes);
    }

    pub fn remove_page(&mut self, path: &str) {
        self.pages.remove(&format!("{}{}", BASE_URL, path));
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn image_requests(&self) -> usize {
        self.requests()
            .iter()
            .filter(|url| self.blobs.contains_key(url.as_str()))
            .count()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record(&self, url: &Url) {
        self.requests.lock().unwrap().push(url.to_string());
    }

    fn not_found(url: &Url) -> AcquisitionError {
        AcquisitionError::Status {
            url: url.to_string(),
            status: 404,
        }
    }
}

impl PageFetcher for FakeSite {
    fn fetch_text(&self, url: &Url) -> Result<String, AcquisitionError> {
        self.record(url);
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Self::not_found(url))
    }

    fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, AcquisitionError> {
        self.record(url);
        self.blobs
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Self::not_found(url))
    }
}

fn url_slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Builds a one-era site: root listing, movement pages, artist pages,
/// painting pages and JPEG images.
pub struct ArtSiteBuilder {
    site: FakeSite,
    movement_items: Vec<String>,
}

#[allow(dead_code)]
impl ArtSiteBuilder {
    pub fn new() -> Self {
        Self {
            site: FakeSite::default(),
            movement_items: Vec::new(),
        }
    }

    /// Add a movement labelled `label` (e.g. "Post-Painterly Abstraction")
    /// with `(artist name, painting count)` entries.
    pub fn movement(mut self, label: &str, artists: &[(&str, usize)]) -> Self {
        let movement_path = format!("{}/{}", ROOT_PATH, url_slug(label));
        self.movement_items.push(format!(
            r#"<li class="dottedItem"><a href="{}">{} {}</a></li>"#,
            movement_path,
            label,
            artists.len()
        ));

        let mut artist_links = String::new();
        for (artist, count) in artists {
            let artist_path = format!("/en/{}", url_slug(artist));
            artist_links.push_str(&format!(r#"<a href="{}">{}</a>"#, artist_path, artist));

            let mut painting_items = String::new();
            for i in 0..*count {
                let painting_path = format!("{}/painting-{}", artist_path, i);
                let image_path = format!("/images{}/{}.jpg", artist_path, i);
                painting_items.push_str(&format!(
                    r#"<li><a href="{}">{} study {}</a></li>"#,
                    painting_path, artist, i
                ));
                self.site
                    .insert_page(&painting_path, format!(r#"<img src="{}">"#, image_path));
                self.site
                    .insert_blob(&image_path, jpeg_bytes(40 + i as u32, 30));
            }
            self.site.insert_page(
                &format!("{}/all-works/text-list", artist_path),
                format!(r#"<ul class="painting-list-text">{}</ul>"#, painting_items),
            );
        }
        self.site.insert_page(
            &format!("{}/text-list", movement_path),
            format!(r#"<div class="masonry-text-view">{}</div>"#, artist_links),
        );
        self
    }

    pub fn movement_count(&self) -> usize {
        self.movement_items.len()
    }

    pub fn build(mut self) -> FakeSite {
        let root = format!(
            r#"<ul>
                 <li class="dottedItem"><a href="{}">All artists 0</a></li>
                 <li class="header"><span>{}</span></li>
                 {}
               </ul>"#,
            ROOT_PATH,
            ERA,
            self.movement_items.join("\n")
        );
        self.site.insert_page(ROOT_PATH, root);
        self.site
    }
}

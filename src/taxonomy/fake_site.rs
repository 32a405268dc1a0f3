//! In-memory [`PageFetcher`] shared by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use reqwest::Url;

use super::fetcher::PageFetcher;
use crate::acquisition::AcquisitionError;

pub const BASE: &str = "https://art.example.org";

/// Pages and image blobs keyed by absolute URL. Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    blobs: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl FakeSite {
    pub fn url(path: &str) -> Url {
        Url::parse(&format!("{}{}", BASE, path)).unwrap()
    }

    pub fn page(&mut self, path: &str, html: &str) {
        self.pages.insert(format!("{}{}", BASE, path), html.to_string());
    }

    pub fn blob(&mut self, path: &str, bytes: &[u8]) {
        self.blobs.insert(format!("{}{}", BASE, path), bytes.to_vec());
    }

    /// A painting page pointing at `image`, whose bytes are its own path.
    pub fn painting(&mut self, path: &str, image: &str) {
        self.page(path, &format!(r#"<img src="{}">"#, image));
        self.blob(image, image.as_bytes());
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn lookup<T: Clone>(
        &self,
        map: &HashMap<String, T>,
        url: &Url,
    ) -> Result<T, AcquisitionError> {
        self.requests.lock().unwrap().push(url.to_string());
        map.get(url.as_str()).cloned().ok_or(AcquisitionError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

impl PageFetcher for FakeSite {
    fn fetch_text(&self, url: &Url) -> Result<String, AcquisitionError> {
        self.lookup(&self.pages, url)
    }

    fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, AcquisitionError> {
        self.lookup(&self.blobs, url)
    }
}

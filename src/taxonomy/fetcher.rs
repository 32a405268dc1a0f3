//! Page fetching seam between the walker and the network.

use anyhow::Result;
use reqwest::blocking::Client;
use reqwest::Url;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::acquisition::AcquisitionError;

/// Blocking access to the taxonomy source.
///
/// The walker only ever talks to the network through this trait, so tests can
/// substitute an in-memory site.
pub trait PageFetcher: Send + Sync {
    /// Fetch a page and return its body as text.
    fn fetch_text(&self, url: &Url) -> Result<String, AcquisitionError>;

    /// Fetch a binary resource (an image) and return its bytes.
    fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, AcquisitionError>;
}

/// `PageFetcher` backed by a blocking reqwest client.
///
/// Requests are issued one at a time; an optional minimum interval spaces
/// them out.
pub struct HttpPageFetcher {
    client: Client,
    min_interval: Duration,
    last_request: Mutex<Instant>,
}

impl HttpPageFetcher {
    pub fn new(user_agent: &str, timeout: Duration, min_interval: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        let now = Instant::now();
        Ok(Self {
            client,
            min_interval,
            last_request: Mutex::new(now.checked_sub(min_interval).unwrap_or(now)),
        })
    }

    fn rate_limit(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            std::thread::sleep(self.min_interval - elapsed);
        }
        *last = Instant::now();
    }

    fn get(&self, url: &Url) -> Result<reqwest::blocking::Response, AcquisitionError> {
        self.rate_limit();
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|source| AcquisitionError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(AcquisitionError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch_text(&self, url: &Url) -> Result<String, AcquisitionError> {
        self.get(url)?
            .text()
            .map_err(|source| AcquisitionError::Transport {
                url: url.to_string(),
                source,
            })
    }

    fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, AcquisitionError> {
        self.get(url)?
            .bytes()
            .map(|bytes| bytes.to_vec())
            .map_err(|source| AcquisitionError::Transport {
                url: url.to_string(),
                source,
            })
    }
}

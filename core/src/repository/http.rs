use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};

use crate::error::FetchFailure;
use crate::repository::traits::SnapshotSource;

/// Reads the published snapshot with a plain GET, bypassing intermediate caches so every
/// read observes the latest upload.
#[derive(Clone)]
pub struct HttpSource {
    url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn no_cache_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers
    }
}

impl SnapshotSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn read_snapshot(&self) -> Result<String, FetchFailure> {
        let response = self
            .client
            .get(&self.url)
            .headers(Self::no_cache_headers())
            .send()
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::HttpStatus(status.as_u16()));
        }

        response.text().map_err(|e| FetchFailure::Transport(e.to_string()))
    }
}

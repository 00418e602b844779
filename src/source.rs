//! Remote feed source.

use std::path::PathBuf;

use calwatch_core::{CalWatchError, CalWatchResult};

/// Where the raw feed document comes from.
pub trait FeedSource {
    async fn fetch(&self) -> CalWatchResult<String>;
}

/// Downloads the feed over HTTP(S).
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
    cache_path: Option<PathBuf>,
}

impl HttpSource {
    pub fn new(url: String, cache_path: Option<PathBuf>) -> HttpSource {
        HttpSource {
            client: reqwest::Client::new(),
            url,
            cache_path,
        }
    }
}

impl FeedSource for HttpSource {
    async fn fetch(&self) -> CalWatchResult<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CalWatchError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CalWatchError::Fetch(format!(
                "calendar download returned status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CalWatchError::Fetch(e.to_string()))?;

        // Mirror the raw document next to the state file when configured.
        // A failed mirror write never fails the run.
        if let Some(path) = &self.cache_path {
            if let Some(dir) = path.parent() {
                let _ = std::fs::create_dir_all(dir);
            }
            if let Err(e) = std::fs::write(path, &body) {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "could not mirror feed to cache file"
                );
            }
        }

        Ok(body)
    }
}

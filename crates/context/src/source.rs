//! Corpus sources: where the requirement texts come from.
//!
//! A locator is an opaque string. [`LocatorSource`] treats `http://` and
//! `https://` locators as URLs and everything else as a filesystem path;
//! [`StaticSource`] serves texts already in memory (compiled-in assets,
//! tests).

use async_trait::async_trait;
use coursechat_core::error::CorpusError;
use std::collections::HashMap;
use tracing::debug;

/// Fetches the full text of one corpus.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<String, CorpusError>;
}

/// Path-or-URL source backed by `tokio::fs` and `reqwest`.
pub struct LocatorSource {
    client: reqwest::Client,
}

impl LocatorSource {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn is_url(locator: &str) -> bool {
        locator.starts_with("http://") || locator.starts_with("https://")
    }

    async fn fetch_url(&self, url: &str) -> Result<String, CorpusError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CorpusError::Network {
                locator: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CorpusError::Http {
                locator: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| CorpusError::Network {
            locator: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn fetch_path(&self, path: &str) -> Result<String, CorpusError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CorpusError::Read {
                locator: path.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Default for LocatorSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CorpusSource for LocatorSource {
    async fn fetch(&self, locator: &str) -> Result<String, CorpusError> {
        debug!(locator, "Fetching corpus");
        if Self::is_url(locator) {
            self.fetch_url(locator).await
        } else {
            self.fetch_path(locator).await
        }
    }
}

/// In-memory source keyed by locator.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    texts: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `text` under `locator`.
    pub fn with(mut self, locator: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(locator.into(), text.into());
        self
    }
}

#[async_trait]
impl CorpusSource for StaticSource {
    async fn fetch(&self, locator: &str) -> Result<String, CorpusError> {
        self.texts
            .get(locator)
            .cloned()
            .ok_or_else(|| CorpusError::Read {
                locator: locator.to_string(),
                reason: "no in-memory corpus registered under this locator".into(),
            })
    }
}

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use url::Url;

use crate::config::Config;
use crate::error::FetchError;

/// Where documents come from. Every call is a fresh read; implementations must not cache.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch_text(&self, location: &str) -> Result<String, FetchError>;
}

/// Fetches `http(s)` locations over the network and everything else from the local filesystem.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("building http client")?;
        Ok(Self { client })
    }

    async fn get(&self, location: &str) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(location)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|source| FetchError::Request { location: location.to_string(), source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { location: location.to_string(), status: status.as_u16() });
        }
        resp.text()
            .await
            .map_err(|source| FetchError::Request { location: location.to_string(), source })
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
        if is_remote(location) {
            tracing::debug!(location, "GET");
            return self.get(location).await;
        }
        let path = location.strip_prefix("file://").unwrap_or(location);
        tracing::debug!(path, "reading local document");
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FetchError::Io { location: location.to_string(), source })
    }
}

pub(crate) fn is_remote(location: &str) -> bool {
    Url::parse(location)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Serves documents from memory. Used when embedding pre-fetched data and in tests.
#[derive(Default)]
pub struct MemorySource {
    documents: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self { Self::default() }

    pub fn with_document(mut self, location: impl Into<String>, body: impl Into<String>) -> Self {
        self.documents.insert(location.into(), body.into());
        self
    }

    /// Locations requested so far, in request order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn fetch_count(&self) -> usize { self.requested().len() }
}

#[async_trait]
impl DocumentSource for MemorySource {
    async fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(location.to_string());
        }
        self.documents
            .get(location)
            .cloned()
            .ok_or_else(|| FetchError::NotFound { location: location.to_string() })
    }
}

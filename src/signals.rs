//! Live founder signal from the Precognition backend
//!
//! Three read-only feeds: themes, emergence and aggregate stats. The trait is
//! the seam the brief engine is generic over, so tests can swap in canned data.

use crate::types::{EmergenceFeed, Theme};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::future::Future;

/// Source of live signal data
pub trait SignalSource {
    /// `GET /api/themes`
    fn themes(&self) -> impl Future<Output = Result<Vec<Theme>>> + Send;

    /// `GET /api/emergence`
    fn emergence(&self) -> impl Future<Output = Result<EmergenceFeed>> + Send;

    /// `GET /api/stats`. Shape is not interpreted.
    fn stats(&self) -> impl Future<Output = Result<serde_json::Value>> + Send;
}

/// HTTP client for the Precognition API
#[derive(Debug, Clone)]
pub struct HttpSignalSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSignalSource {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("{} returned {}: {}", url, status, body));
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Invalid JSON from {}", url))
    }
}

impl SignalSource for HttpSignalSource {
    async fn themes(&self) -> Result<Vec<Theme>> {
        self.get_json("/api/themes").await
    }

    async fn emergence(&self) -> Result<EmergenceFeed> {
        self.get_json("/api/emergence").await
    }

    async fn stats(&self) -> Result<serde_json::Value> {
        self.get_json("/api/stats").await
    }
}

// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::error::Result;
use crate::models::ScraperConfig;

/// Outcome of probing a single candidate URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// The server answered `200 OK`; carries the response body.
    Found(String),
    /// The server answered with any other status.
    Rejected(StatusCode),
}

/// Network seam used by the resolver.
///
/// Transport failures (timeout, connection refused, ...) are returned as
/// errors; HTTP-level refusals are [`Probe::Rejected`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn probe(&self, url: &Url) -> Result<Probe>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &ScraperConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// [`PageFetcher`] backed by a single shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build the client from scraper settings.
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        Ok(Self::new(create_client(config)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn probe(&self, url: &Url) -> Result<Probe> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Ok(Probe::Rejected(status));
        }
        Ok(Probe::Found(response.text().await?))
    }
}

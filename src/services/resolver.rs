// src/services/resolver.rs

//! Route page resolution.
//!
//! The site has no consistent URL scheme for route pages, so each identifier
//! is substituted into an ordered list of path templates and the candidates
//! are probed one by one until one answers `200 OK`.

use std::sync::Arc;

use url::Url;

use crate::error::Result;
use crate::models::{RouteId, ScraperConfig};
use crate::utils::http::{PageFetcher, Probe};
use crate::utils::url::candidate_url;

/// A route page that answered `200 OK`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPage {
    pub url: Url,
    pub body: String,
}

/// Probes candidate URLs for a route, first success wins.
pub struct UrlResolver {
    base_url: Url,
    templates: Vec<String>,
    fetcher: Arc<dyn PageFetcher>,
}

impl UrlResolver {
    /// Create a resolver for the configured site and templates.
    pub fn new(config: &ScraperConfig, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(&config.base_url)?,
            templates: config.url_templates.clone(),
            fetcher,
        })
    }

    /// Candidate URLs for `id`, in probing order.
    ///
    /// Templates that do not produce a valid URL are skipped.
    pub fn candidates(&self, id: &RouteId) -> Vec<Url> {
        self.templates
            .iter()
            .filter_map(|template| match candidate_url(&self.base_url, template, id) {
                Ok(url) => Some(url),
                Err(e) => {
                    log::debug!("Skipping template '{}' for route {}: {}", template, id, e);
                    None
                }
            })
            .collect()
    }

    /// Fetch the first candidate page that answers `200 OK`.
    ///
    /// Transport errors and other statuses only move on to the next
    /// candidate. Returns `None` once every candidate has failed.
    pub async fn resolve(&self, id: &RouteId) -> Option<ResolvedPage> {
        for url in self.candidates(id) {
            match self.fetcher.probe(&url).await {
                Ok(Probe::Found(body)) => {
                    log::debug!("Route {} resolved at {}", id, url);
                    return Some(ResolvedPage { url, body });
                }
                Ok(Probe::Rejected(status)) => {
                    log::debug!("{} answered {}", url, status);
                }
                Err(e) => {
                    log::debug!("Failed to fetch {}: {}", url, e);
                }
            }
        }
        None
    }
}

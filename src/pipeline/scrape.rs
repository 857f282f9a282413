// src/pipeline/scrape.rs

//! Route scraping pipeline.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::models::{Config, IdentifierSpace, RouteId, RouteRecord, RunReport};
use crate::pipeline::{BatchRunner, Shutdown};
use crate::services::{CoverageClassifier, FieldExtractor, UrlResolver};
use crate::storage::{PersistOutcome, RecordSink};
use crate::utils::http::PageFetcher;

/// Build the resolver and extractor for a configuration.
fn build_services(
    config: &Config,
    fetcher: Arc<dyn PageFetcher>,
) -> Result<(UrlResolver, FieldExtractor)> {
    let resolver = UrlResolver::new(&config.scraper, fetcher)?;
    let classifier = CoverageClassifier::new(&config.classifier);
    let extractor = FieldExtractor::new(classifier)?;
    Ok((resolver, extractor))
}

/// Scrape every route in `space` and persist the results to `sink`.
///
/// Per-route failures only count against the report. Whatever was
/// gathered is persisted, including after an interruption.
pub async fn run_scraper(
    config: &Config,
    space: &IdentifierSpace,
    fetcher: Arc<dyn PageFetcher>,
    sink: &dyn RecordSink,
    shutdown: Shutdown,
) -> Result<RunReport> {
    log::info!("BEST route scraper starting against {}", config.scraper.base_url);

    let (resolver, extractor) = build_services(config, fetcher)?;
    let runner = BatchRunner::new(&resolver, &extractor, shutdown)
        .with_delay(Duration::from_millis(config.scraper.request_delay_ms))
        .with_progress_every(config.batch.progress_every);

    let outcome = runner.run(space).await;
    if outcome.records.is_empty() {
        log::error!("No routes were scraped successfully");
    }

    match sink.persist(&outcome.records).await? {
        PersistOutcome::Written { count, location } => {
            log::info!("Snapshot of {} routes written to {}", count, location);
        }
        PersistOutcome::Skipped => log::debug!("Nothing persisted"),
    }

    Ok(outcome.report)
}

/// Resolve and extract a single route without persisting it.
pub async fn scrape_route(
    config: &Config,
    fetcher: Arc<dyn PageFetcher>,
    id: &RouteId,
) -> Result<Option<RouteRecord>> {
    let (resolver, extractor) = build_services(config, fetcher)?;
    let runner = BatchRunner::new(&resolver, &extractor, Shutdown::new());
    Ok(runner.scrape_one(id).await)
}

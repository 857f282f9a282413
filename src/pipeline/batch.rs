// src/pipeline/batch.rs

//! Sequential batch scraping over an identifier space.

use std::time::Duration;

use crate::models::{IdentifierSpace, RouteId, RouteRecord, RunReport};
use crate::pipeline::Shutdown;
use crate::services::{FieldExtractor, UrlResolver};

/// Records and counts of one batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    pub records: Vec<RouteRecord>,
    pub report: RunReport,
}

/// Visits routes one at a time: resolve, extract, pause.
pub struct BatchRunner<'a> {
    resolver: &'a UrlResolver,
    extractor: &'a FieldExtractor,
    shutdown: Shutdown,
    delay: Duration,
    progress_every: usize,
}

impl<'a> BatchRunner<'a> {
    pub fn new(resolver: &'a UrlResolver, extractor: &'a FieldExtractor, shutdown: Shutdown) -> Self {
        Self {
            resolver,
            extractor,
            shutdown,
            delay: Duration::ZERO,
            progress_every: 50,
        }
    }

    /// Pause after every route.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Log progress every `n` numeric routes.
    pub fn with_progress_every(mut self, n: usize) -> Self {
        self.progress_every = n.max(1);
        self
    }

    /// Resolve and extract a single route.
    pub async fn scrape_one(&self, id: &RouteId) -> Option<RouteRecord> {
        log::info!("Scraping route {}...", id);
        let Some(page) = self.resolver.resolve(id).await else {
            log::warn!("No data found for route {}", id);
            return None;
        };
        log::debug!("Extracting route {} from {}", id, page.url);
        Some(self.extractor.extract(id, &page.body))
    }

    /// Scrape every route in `space`, numeric range first.
    ///
    /// A failed route is tallied and skipped. On interruption the records
    /// gathered so far are returned.
    pub async fn run(&self, space: &IdentifierSpace) -> BatchOutcome {
        let mut report = RunReport::start();
        let mut records = Vec::new();
        let numeric_total = space.numeric_len();

        log::info!(
            "Scraping {} routes ({} numeric, {} irregular)",
            space.len(),
            numeric_total,
            space.irregular().len()
        );

        for (index, id) in space.iter().enumerate() {
            if self.shutdown.is_triggered() {
                log::warn!(
                    "Scraping interrupted by user after {} of {} routes",
                    report.attempted,
                    space.len()
                );
                report.interrupted = true;
                break;
            }

            match self.scrape_one(&id).await {
                Some(record) => {
                    records.push(record);
                    report.record_success();
                    log::info!("Successfully scraped route {}", id);
                }
                None => {
                    report.record_failure();
                    log::warn!("Failed to scrape route {}", id);
                }
            }

            let processed = index + 1;
            if self.reports_progress_at(processed, numeric_total) {
                log::info!(
                    "Progress: {}/{} routes processed ({} ok, {} failed)",
                    processed,
                    numeric_total,
                    report.succeeded,
                    report.failed
                );
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        report.finish();
        log::info!("Scraping completed: {}", report.summary());

        BatchOutcome { records, report }
    }

    /// Progress is logged every `progress_every` routes of the numeric range.
    fn reports_progress_at(&self, processed: usize, numeric_total: usize) -> bool {
        processed <= numeric_total && processed % self.progress_every == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{ScraperConfig, UNKNOWN};
    use crate::services::CoverageClassifier;
    use crate::utils::http::mock::{Reply, ScriptedFetcher};
    use crate::utils::http::{PageFetcher, Probe};

    fn parts(fetcher: Arc<ScriptedFetcher>) -> (UrlResolver, FieldExtractor) {
        let resolver = UrlResolver::new(&ScraperConfig::default(), fetcher).unwrap();
        let extractor = FieldExtractor::new(CoverageClassifier::default()).unwrap();
        (resolver, extractor)
    }

    fn page(text: &str) -> Reply {
        Reply::Page(format!("<html><body><p>{text}</p></body></html>"))
    }

    #[tokio::test]
    async fn test_every_route_has_one_outcome() {
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .on("/route-no/1/", page("from colaba to worli"))
                .on("/bus-3/", page("every 10 minutes"))
                .on("/route-2/", Reply::Timeout)
                .on("/route/2LTD/", page("first bus 06:00")),
        );
        let (resolver, extractor) = parts(fetcher);
        let space = IdentifierSpace::new(1..=4, ["1LTD", "2LTD"]);

        let outcome = BatchRunner::new(&resolver, &extractor, Shutdown::new())
            .run(&space)
            .await;

        let report = &outcome.report;
        assert_eq!(report.attempted, space.len());
        assert_eq!(report.succeeded + report.failed, space.len());
        assert_eq!(report.succeeded, outcome.records.len());
        assert_eq!(report.succeeded, 3);
        assert!(!report.interrupted);

        let ids: Vec<&str> = outcome
            .records
            .iter()
            .map(|r| r.identifier().as_str())
            .collect();
        assert_eq!(ids, ["1", "3", "2LTD"]);
        assert_eq!(outcome.records[0].source(), "Colaba");
        assert_eq!(outcome.records[1].frequency(), "10 minutes");
        assert_eq!(outcome.records[2].first_departure(), "06:00");
        assert_eq!(outcome.records[2].last_departure(), UNKNOWN);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_follows_every_route() {
        let fetcher = Arc::new(ScriptedFetcher::new().on("/route-no/2/", page("from a to b")));
        let (resolver, extractor) = parts(fetcher);
        let space = IdentifierSpace::new(1..=3, ["1LTD"]);

        let started = tokio::time::Instant::now();
        let outcome = BatchRunner::new(&resolver, &extractor, Shutdown::new())
            .with_delay(Duration::from_secs(1))
            .run(&space)
            .await;
        let elapsed = started.elapsed();

        assert_eq!(outcome.report.succeeded, 1);
        assert_eq!(outcome.report.failed, 3);
        assert!(elapsed >= Duration::from_secs(4), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(5), "{elapsed:?}");
    }

    #[test]
    fn test_progress_points_stay_in_numeric_range() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let (resolver, extractor) = parts(fetcher);
        let runner =
            BatchRunner::new(&resolver, &extractor, Shutdown::new()).with_progress_every(50);

        let points: Vec<usize> = (1..=610)
            .filter(|&processed| runner.reports_progress_at(processed, 600))
            .collect();
        let expected: Vec<usize> = (1..=12).map(|n| n * 50).collect();
        assert_eq!(points, expected);

        let every_one = runner.with_progress_every(0);
        assert!(every_one.reports_progress_at(1, 3));
        assert!(!every_one.reports_progress_at(4, 3));
    }

    #[tokio::test]
    async fn test_interrupted_before_start_probes_nothing() {
        let fetcher = Arc::new(ScriptedFetcher::new().on("/route-no/1/", page("x")));
        let (resolver, extractor) = parts(Arc::clone(&fetcher));
        let shutdown = Shutdown::new();
        let runner = BatchRunner::new(&resolver, &extractor, shutdown.clone());

        let first = runner.scrape_one(&RouteId::from("1")).await;
        assert!(first.is_some());

        shutdown.trigger();
        let outcome = runner.run(&IdentifierSpace::new(1..=5, [])).await;
        assert!(outcome.report.interrupted);
        assert_eq!(outcome.report.attempted, 0);
        assert!(outcome.records.is_empty());
        // Only the scrape_one call above reached the network.
        assert_eq!(fetcher.requested(), ["/route-no/1/"]);
    }

    #[tokio::test]
    async fn test_interruption_mid_run() {
        struct TripAfterFirst {
            inner: ScriptedFetcher,
            shutdown: Shutdown,
        }

        #[async_trait::async_trait]
        impl PageFetcher for TripAfterFirst {
            async fn probe(&self, url: &url::Url) -> crate::error::Result<Probe> {
                let probe = self.inner.probe(url).await;
                self.shutdown.trigger();
                probe
            }
        }

        let shutdown = Shutdown::new();
        let fetcher = Arc::new(TripAfterFirst {
            inner: ScriptedFetcher::new().on("/route-no/1/", page("from a to b")),
            shutdown: shutdown.clone(),
        });
        let resolver = UrlResolver::new(&ScraperConfig::default(), fetcher).unwrap();
        let extractor = FieldExtractor::new(CoverageClassifier::default()).unwrap();

        let outcome = BatchRunner::new(&resolver, &extractor, shutdown)
            .run(&IdentifierSpace::new(1..=3, ["1LTD"]))
            .await;

        assert!(outcome.report.interrupted);
        assert_eq!(outcome.report.attempted, 1);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].identifier().as_str(), "1");
    }
}

//! Run report for a single batch invocation.

use chrono::{DateTime, Utc};

/// Aggregate outcome counts of one batch run. Logged, never persisted.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Run stopped early on user request
    pub interrupted: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            attempted: 0,
            succeeded: 0,
            failed: 0,
            interrupted: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self) {
        self.attempted += 1;
        self.failed += 1;
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Fraction of attempted identifiers that produced a record.
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.attempted as f64
        }
    }

    pub fn elapsed_secs(&self) -> i64 {
        self.finished_at
            .unwrap_or_else(Utc::now)
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// One-line summary for the log.
    pub fn summary(&self) -> String {
        format!(
            "{} routes attempted, {} succeeded, {} failed ({:.1}% success) in {}s{}",
            self.attempted,
            self.succeeded,
            self.failed,
            self.success_rate() * 100.0,
            self.elapsed_secs(),
            if self.interrupted { ", interrupted" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tallies_sum_to_attempted() {
        let mut report = RunReport::start();
        report.record_success();
        report.record_failure();
        report.record_failure();
        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded + report.failed, report.attempted);
    }

    #[test]
    fn test_success_rate_empty() {
        assert_eq!(RunReport::start().success_rate(), 0.0);
    }

    #[test]
    fn test_summary_mentions_interruption() {
        let mut report = RunReport::start();
        report.record_success();
        report.interrupted = true;
        report.finish();
        let summary = report.summary();
        assert!(summary.starts_with("1 routes attempted, 1 succeeded, 0 failed (100.0% success)"));
        assert!(summary.ends_with(", interrupted"));
    }
}

//! Storage abstractions for route record persistence.
//!
//! A run's records are written as one snapshot that replaces whatever the
//! destination held before; there is no append or merge.

pub mod csv;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::RouteRecord;

// Re-export for convenience
pub use self::csv::CsvStorage;

/// Result of a persist call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Nothing to write; the destination was left untouched.
    Skipped,
    /// Records written to `location`.
    Written { count: usize, location: String },
}

/// Trait for record storage backends.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Replace the stored snapshot with `records`.
    ///
    /// An empty slice is logged and skipped. Write failures are returned.
    async fn persist(&self, records: &[RouteRecord]) -> Result<PersistOutcome>;
}

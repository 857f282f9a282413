//! CSV file storage.
//!
//! Writes one header row followed by one row per record, columns in
//! [`COLUMNS`] order, UTF-8 and comma-delimited. Files are written to a
//! temporary sibling and renamed over the destination.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{COLUMNS, RouteRecord};
use crate::storage::{PersistOutcome, RecordSink};

/// CSV file backend.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
}

impl CsvStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encode records, header first.
    pub fn encode(records: &[RouteRecord]) -> Result<Vec<u8>> {
        let mut writer = ::csv::Writer::from_writer(Vec::new());
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| AppError::Io(std::io::Error::other(e.to_string())))
    }

    /// Decode a CSV snapshot, checking the header.
    pub fn decode(bytes: &[u8]) -> Result<Vec<RouteRecord>> {
        let mut reader = ::csv::Reader::from_reader(bytes);
        let headers = reader.headers()?;
        if !headers.iter().eq(COLUMNS) {
            return Err(AppError::validation(format!(
                "unexpected CSV header: {}",
                headers.iter().collect::<Vec<_>>().join(",")
            )));
        }
        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<RouteRecord>, _>>()?;
        Ok(records)
    }

    /// Load the stored snapshot.
    pub async fn load(&self) -> Result<Vec<RouteRecord>> {
        let bytes = tokio::fs::read(&self.path).await?;
        Self::decode(&bytes)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("csv.tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordSink for CsvStorage {
    async fn persist(&self, records: &[RouteRecord]) -> Result<PersistOutcome> {
        if records.is_empty() {
            log::warn!("No routes to save; {} left untouched", self.path.display());
            return Ok(PersistOutcome::Skipped);
        }

        let bytes = Self::encode(records)?;
        self.write_bytes(&bytes).await?;

        let location = self.path.display().to_string();
        log::info!("Saved {} routes to {}", records.len(), location);
        Ok(PersistOutcome::Written {
            count: records.len(),
            location,
        })
    }
}

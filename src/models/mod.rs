// src/models/mod.rs

//! Domain models for the scraper.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod record;
mod report;
mod route;

// Re-export all public types
pub use config::{
    BatchConfig, ClassifierConfig, Config, ID_PLACEHOLDER, OutputConfig, ScraperConfig,
};
pub use record::{ACTIVE, COLUMNS, RouteFields, RouteRecord, UNKNOWN};
pub use report::RunReport;
pub use route::{IdentifierSpace, RouteId};

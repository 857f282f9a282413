//! Service layer for the scraper.
//!
//! This module contains the business logic for:
//! - Route page resolution (`UrlResolver`)
//! - Field extraction (`FieldExtractor`) driven by the `patterns` rule chains
//! - Fallback coverage classification (`CoverageClassifier`)

mod classifier;
mod extractor;
pub mod patterns;
mod resolver;

pub use classifier::CoverageClassifier;
pub use extractor::FieldExtractor;
pub use patterns::PatternLibrary;
pub use resolver::{ResolvedPage, UrlResolver};

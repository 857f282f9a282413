//! Route page field extraction.

use crate::error::Result;
use crate::models::{RouteFields, RouteId, RouteRecord};
use crate::services::CoverageClassifier;
use crate::services::patterns::PatternLibrary;
use crate::utils::text::visible_text;

/// Turns a fetched route page into a [`RouteRecord`].
#[derive(Debug)]
pub struct FieldExtractor {
    patterns: PatternLibrary,
    classifier: CoverageClassifier,
}

impl FieldExtractor {
    /// Compile the pattern library for the classifier's categories.
    pub fn new(classifier: CoverageClassifier) -> Result<Self> {
        let patterns = PatternLibrary::new(classifier.categories())?;
        Ok(Self {
            patterns,
            classifier,
        })
    }

    pub fn classifier(&self) -> &CoverageClassifier {
        &self.classifier
    }

    /// Extract a record from raw page HTML. Never fails: fields no rule
    /// matches stay unknown, and each field is extracted independently.
    pub fn extract(&self, id: &RouteId, html: &str) -> RouteRecord {
        let text = visible_text(html).to_lowercase();
        self.extract_text(id, &text)
    }

    /// Extract a record from already lower-cased page text.
    pub fn extract_text(&self, id: &RouteId, text: &str) -> RouteRecord {
        let endpoints = self.patterns.endpoints.first_match(text).map(|m| m.value);
        let hours = self.patterns.hours(text);

        let fields = RouteFields {
            source: endpoints.as_ref().map(|e| e.source.clone()),
            destination: endpoints.map(|e| e.destination),
            frequency: self.patterns.frequency.first_match(text).map(|m| m.value),
            first_departure: hours.first.clone(),
            last_departure: hours.last,
            fare_range: self.patterns.fare.first_match(text).map(|m| m.value),
        };

        let category = self.category(id, text);
        let record = RouteRecord::new(id.clone(), category, fields);
        log::debug!(
            "Route {}: {} of 6 fields unknown",
            id,
            record.unknown_count()
        );
        record
    }

    /// Category named on the page, or the classifier's fallback.
    fn category(&self, id: &RouteId, text: &str) -> String {
        self.patterns
            .category
            .first_match(text)
            .and_then(|m| self.classifier.recognize(&m.value))
            .unwrap_or_else(|| self.classifier.classify(id))
            .to_string()
    }
}

//! Route record data structure.

use serde::{Deserialize, Serialize};

use crate::models::RouteId;

/// Placeholder for fields no extraction rule could fill.
pub const UNKNOWN: &str = "Unknown";

/// Status of every route whose page could be fetched.
pub const ACTIVE: &str = "Active";

/// CSV column order; mirrors the field order of [`RouteRecord`].
pub const COLUMNS: [&str; 9] = [
    "identifier",
    "status",
    "category",
    "source",
    "destination",
    "frequency",
    "first_departure",
    "last_departure",
    "fare_range",
];

/// Extracted data for one route.
///
/// Field order is the persisted column order. Every field is always present;
/// missing information is [`UNKNOWN`]. A record is fixed once built: fields
/// are only set by [`RouteRecord::new`] or by deserializing a stored row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    identifier: RouteId,
    status: String,
    category: String,
    source: String,
    destination: String,
    frequency: String,
    first_departure: String,
    last_departure: String,
    fare_range: String,
}

/// Values found on a route page. `None` means no rule matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteFields {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub frequency: Option<String>,
    pub first_departure: Option<String>,
    pub last_departure: Option<String>,
    pub fare_range: Option<String>,
}

impl RouteRecord {
    /// Build a record for a fetched route page.
    pub fn new(identifier: RouteId, category: impl Into<String>, fields: RouteFields) -> Self {
        let or_unknown = |value: Option<String>| value.unwrap_or_else(|| UNKNOWN.to_string());

        Self {
            identifier,
            status: ACTIVE.to_string(),
            category: category.into(),
            source: or_unknown(fields.source),
            destination: or_unknown(fields.destination),
            frequency: or_unknown(fields.frequency),
            first_departure: or_unknown(fields.first_departure),
            last_departure: or_unknown(fields.last_departure),
            fare_range: or_unknown(fields.fare_range),
        }
    }

    pub fn identifier(&self) -> &RouteId {
        &self.identifier
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Headway, e.g. `15 minutes`.
    pub fn frequency(&self) -> &str {
        &self.frequency
    }

    pub fn first_departure(&self) -> &str {
        &self.first_departure
    }

    pub fn last_departure(&self) -> &str {
        &self.last_departure
    }

    /// `₹low-high` or `₹amount`.
    pub fn fare_range(&self) -> &str {
        &self.fare_range
    }

    /// Number of extracted fields that are still [`UNKNOWN`].
    pub fn unknown_count(&self) -> usize {
        [
            &self.source,
            &self.destination,
            &self.frequency,
            &self.first_departure,
            &self.last_departure,
            &self.fare_range,
        ]
        .into_iter()
        .filter(|v| v.as_str() == UNKNOWN)
        .count()
    }
}

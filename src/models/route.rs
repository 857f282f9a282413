//! Route identifiers and the identifier space of a batch run.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Opaque route designation, e.g. `"42"` or `"7LTD"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(String);

impl RouteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First maximal run of ASCII digits, if any.
    pub fn leading_digits(&self) -> Option<&str> {
        let start = self.0.find(|c: char| c.is_ascii_digit())?;
        let rest = &self.0[start..];
        let len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        Some(&rest[..len])
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RouteId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u32> for RouteId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

/// Identifiers visited by one batch run: a contiguous numeric range followed
/// by a fixed set of irregular designations.
#[derive(Debug, Clone)]
pub struct IdentifierSpace {
    range: RangeInclusive<u32>,
    irregular: Vec<RouteId>,
}

impl IdentifierSpace {
    pub fn new<'a>(
        range: RangeInclusive<u32>,
        irregular: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            range,
            irregular: irregular.into_iter().map(RouteId::from).collect(),
        }
    }

    /// Number of identifiers in the numeric range.
    pub fn numeric_len(&self) -> usize {
        if self.range.is_empty() {
            0
        } else {
            (*self.range.end() - *self.range.start()) as usize + 1
        }
    }

    /// Total number of identifiers.
    pub fn len(&self) -> usize {
        self.numeric_len() + self.irregular.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> &RangeInclusive<u32> {
        &self.range
    }

    pub fn irregular(&self) -> &[RouteId] {
        &self.irregular
    }

    /// Iterate numeric identifiers first, then irregular ones.
    pub fn iter(&self) -> impl Iterator<Item = RouteId> + '_ {
        self.range
            .clone()
            .map(RouteId::from)
            .chain(self.irregular.iter().cloned())
    }
}

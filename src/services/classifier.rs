//! Coverage area classification.
//!
//! Maps a route identifier onto one of a fixed, ordered list of coverage
//! areas when the route page does not name one. The mapping only has to be
//! plausible and stable: the same identifier must always land in the same
//! area, in this process and in every later one.

use sha2::{Digest, Sha256};

use crate::models::{ClassifierConfig, RouteId};

/// Deterministic identifier → coverage area mapping.
#[derive(Debug, Clone)]
pub struct CoverageClassifier {
    categories: Vec<String>,
    fallback: String,
}

impl CoverageClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            categories: config.categories.clone(),
            fallback: config.fallback_category.clone(),
        }
    }

    /// Coverage area for `id`. Never fails.
    ///
    /// Uses the first run of digits in the identifier (`"7LTD"` → 7), or a
    /// SHA-256 derived number when it has none, reduced modulo the number
    /// of categories.
    pub fn classify(&self, id: &RouteId) -> &str {
        match self.index_of(id) {
            Some(index) => &self.categories[index],
            None => {
                log::warn!(
                    "No coverage categories configured; route {} classified as {}",
                    id,
                    self.fallback
                );
                &self.fallback
            }
        }
    }

    /// Configured category whose name `text` spells, ignoring case and
    /// spacing.
    pub fn recognize(&self, text: &str) -> Option<&str> {
        let wanted = normalize(text);
        self.categories
            .iter()
            .find(|c| normalize(c) == wanted)
            .map(String::as_str)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    fn index_of(&self, id: &RouteId) -> Option<usize> {
        let n = self.categories.len() as u64;
        if n == 0 {
            return None;
        }
        let index = match id.leading_digits() {
            Some(digits) => digits_mod(digits, n),
            None => stable_hash(id.as_str()) % n,
        };
        Some(index as usize)
    }
}

impl Default for CoverageClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

/// `digits` (ASCII decimal, any length) modulo `n`, without overflow.
fn digits_mod(digits: &str, n: u64) -> u64 {
    digits
        .bytes()
        .fold(0, |acc, b| (acc * 10 + u64::from(b - b'0')) % n)
}

/// First eight bytes of the SHA-256 digest, big-endian.
fn stable_hash(s: &str) -> u64 {
    let digest = Sha256::digest(s.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::IdentifierSpace;

/// Placeholder substituted with the route identifier in URL templates.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and probing behavior settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Identifier space and pacing of a batch run
    #[serde(default)]
    pub batch: BatchConfig,

    /// Coverage categories for the fallback classifier
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Result file settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.scraper.user_agent.trim().is_empty() {
            return Err(AppError::validation("scraper.user_agent is empty"));
        }
        if self.scraper.timeout_secs == 0 {
            return Err(AppError::validation("scraper.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.scraper.base_url).map_err(|e| {
            AppError::validation(format!(
                "scraper.base_url '{}' is not a valid URL: {e}",
                self.scraper.base_url
            ))
        })?;
        if self.scraper.url_templates.is_empty() {
            return Err(AppError::validation("No URL templates defined"));
        }
        if let Some(template) = self
            .scraper
            .url_templates
            .iter()
            .find(|t| !t.contains(ID_PLACEHOLDER))
        {
            return Err(AppError::validation(format!(
                "URL template '{template}' has no {ID_PLACEHOLDER} placeholder"
            )));
        }
        if self.batch.start > self.batch.end {
            return Err(AppError::validation(format!(
                "batch.start ({}) is greater than batch.end ({})",
                self.batch.start, self.batch.end
            )));
        }
        if self.batch.progress_every == 0 {
            return Err(AppError::validation("batch.progress_every must be > 0"));
        }
        if self.classifier.categories.is_empty() {
            return Err(AppError::validation("No coverage categories defined"));
        }
        if self.classifier.fallback_category.trim().is_empty() {
            return Err(AppError::validation("classifier.fallback_category is empty"));
        }
        Ok(())
    }

    /// Identifier space described by the `[batch]` section.
    pub fn identifier_space(&self) -> IdentifierSpace {
        IdentifierSpace::new(
            self.batch.start..=self.batch.end,
            self.batch.irregular.iter().map(String::as_str),
        )
    }
}

/// HTTP client and probing behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Site root that URL templates are joined onto
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay after each identifier in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Candidate path templates, probed in order
    #[serde(default = "defaults::url_templates")]
    pub url_templates: Vec<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            url_templates: defaults::url_templates(),
        }
    }
}

/// Identifier space and progress reporting for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// First route number (inclusive)
    #[serde(default = "defaults::start")]
    pub start: u32,

    /// Last route number (inclusive)
    #[serde(default = "defaults::end")]
    pub end: u32,

    /// Known irregular identifiers appended after the numeric range
    #[serde(default = "defaults::irregular")]
    pub irregular: Vec<String>,

    /// Emit a progress line every this many numeric identifiers
    #[serde(default = "defaults::progress_every")]
    pub progress_every: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            start: defaults::start(),
            end: defaults::end(),
            irregular: defaults::irregular(),
            progress_every: defaults::progress_every(),
        }
    }
}

/// Fallback classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Ordered coverage areas; index is derived from the identifier
    #[serde(default = "defaults::categories")]
    pub categories: Vec<String>,

    /// Broad region used when no category can be derived
    #[serde(default = "defaults::fallback_category")]
    pub fallback_category: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            categories: defaults::categories(),
            fallback_category: defaults::fallback_category(),
        }
    }
}

/// Result file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// CSV destination, overwritten on every run
    #[serde(default = "defaults::output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: defaults::output_path(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Scraper defaults
    pub fn base_url() -> String {
        "https://mumbaicitybus.in".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn request_delay() -> u64 {
        1000
    }
    pub fn url_templates() -> Vec<String> {
        vec![
            "/route-no/{id}/".into(),
            "/route-{id}/".into(),
            "/bus-{id}/".into(),
            "/{id}/".into(),
            "/best-bus-{id}/".into(),
            "/route/{id}/".into(),
        ]
    }

    // Batch defaults
    pub fn start() -> u32 {
        1
    }
    pub fn end() -> u32 {
        600
    }
    pub fn irregular() -> Vec<String> {
        (1..=10).map(|n| format!("{n}LTD")).collect()
    }
    pub fn progress_every() -> usize {
        50
    }

    // Classifier defaults
    pub fn categories() -> Vec<String> {
        [
            "South Mumbai",
            "Western Suburbs",
            "Central Suburbs",
            "Eastern Suburbs",
            "Navi Mumbai",
            "Thane",
            "Mira-Bhayandar",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
    pub fn fallback_category() -> String {
        "Mumbai Metropolitan Region".into()
    }

    // Output defaults
    pub fn output_path() -> PathBuf {
        PathBuf::from("mumbai_best_routes.csv")
    }
}

// src/utils/url.rs

//! Candidate URL construction.

use url::Url;

use crate::error::Result;
use crate::models::{ID_PLACEHOLDER, RouteId};

/// Substitute `id` into a path template and join it onto `base`.
///
/// # Examples
/// ```
/// use best_scraper::models::RouteId;
/// use best_scraper::utils::url::candidate_url;
/// use url::Url;
///
/// let base = Url::parse("https://mumbaicitybus.in").unwrap();
/// let url = candidate_url(&base, "/route-no/{id}/", &RouteId::from("42")).unwrap();
/// assert_eq!(url.as_str(), "https://mumbaicitybus.in/route-no/42/");
/// ```
pub fn candidate_url(base: &Url, template: &str, id: &RouteId) -> Result<Url> {
    let path = template.replace(ID_PLACEHOLDER, id.as_str());
    Ok(base.join(&path)?)
}

//! Pipeline entry points for scraper operations.
//!
//! - `run_scraper`: Scrape an identifier space and persist the snapshot
//! - `scrape_route`: Resolve and extract one route

pub mod batch;
pub mod scrape;
mod shutdown;

pub use batch::{BatchOutcome, BatchRunner};
pub use scrape::{run_scraper, scrape_route};
pub use shutdown::Shutdown;

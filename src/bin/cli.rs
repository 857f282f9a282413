//! BEST route scraper CLI
//!
//! Local execution entry point.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use best_scraper::{
    error::Result,
    models::{Config, RouteId, UNKNOWN},
    pipeline::{self, Shutdown},
    services::CoverageClassifier,
    storage::CsvStorage,
    utils::http::{HttpFetcher, PageFetcher},
};
use clap::{Parser, Subcommand};

/// BEST bus route scraper
#[derive(Parser, Debug)]
#[command(
    name = "best-scraper",
    version,
    about = "Scrapes BEST bus route pages into a CSV file"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape every route in the configured range and write the CSV
    Scrape {
        /// First numeric route (overrides batch.start)
        #[arg(long)]
        start: Option<u32>,

        /// Last numeric route (overrides batch.end)
        #[arg(long)]
        end: Option<u32>,

        /// Output CSV path (overrides output.path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the irregular identifiers
        #[arg(long)]
        no_irregular: bool,
    },

    /// Scrape a single route and print it as JSON
    Route {
        /// Route identifier, e.g. 42 or 3LTD
        id: String,
    },

    /// Print the fallback coverage category of each identifier
    Classify {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Summarise a previously written CSV
    Show {
        /// CSV path (default: output.path)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn fetcher(config: &Config) -> Result<Arc<dyn PageFetcher>> {
    Ok(Arc::new(HttpFetcher::from_config(&config.scraper)?))
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Scrape {
            start,
            end,
            output,
            no_irregular,
        } => {
            let mut config = config;
            if let Some(start) = start {
                config.batch.start = start;
            }
            if let Some(end) = end {
                config.batch.end = end;
            }
            if no_irregular {
                config.batch.irregular.clear();
            }
            if let Some(output) = output {
                config.output.path = output;
            }
            config.validate()?;

            let space = config.identifier_space();
            let storage = CsvStorage::new(&config.output.path);
            let shutdown = Shutdown::new();
            shutdown.listen_for_ctrl_c();

            let report =
                pipeline::run_scraper(&config, &space, fetcher(&config)?, &storage, shutdown)
                    .await?;

            log::info!(
                "Success rate: {:.1}% in {}s",
                report.success_rate() * 100.0,
                report.elapsed_secs()
            );
            if report.interrupted {
                log::warn!("Run was interrupted; the CSV holds a partial result");
            }
        }

        Command::Route { id } => {
            let id = RouteId::new(id);
            match pipeline::scrape_route(&config, fetcher(&config)?, &id).await? {
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => log::warn!("No page found for route {}", id),
            }
        }

        Command::Classify { ids } => {
            let classifier = CoverageClassifier::new(&config.classifier);
            for id in ids.into_iter().map(RouteId::new) {
                println!("{}\t{}", id, classifier.classify(&id));
            }
        }

        Command::Show { path } => {
            let path = path.unwrap_or_else(|| config.output.path.clone());
            let records = CsvStorage::new(&path).load().await?;
            log::info!("{} routes in {}", records.len(), path.display());

            let mut by_category: BTreeMap<&str, usize> = BTreeMap::new();
            for record in &records {
                *by_category.entry(record.category()).or_default() += 1;
            }
            for (category, count) in by_category {
                println!("{category}: {count}");
            }

            let complete = records.iter().filter(|r| r.unknown_count() == 0).count();
            let no_endpoints = records.iter().filter(|r| r.source() == UNKNOWN).count();
            println!("Fully extracted: {complete}");
            println!("Missing endpoints: {no_endpoints}");
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} templates, {} routes, {} categories)",
                config.scraper.url_templates.len(),
                config.identifier_space().len(),
                config.classifier.categories.len()
            );
        }
    }

    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("BEST route scraper starting...");

    if let Err(e) = run(cli).await {
        log::error!("{}", e);
        return;
    }

    log::info!("Done!");
}

//! Sitemapper main entry point
//!
//! This is the command-line interface for the Sitemapper site crawler.

use anyhow::Context;
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use sitemapper::config::{load_config_with_hash, validate, Config};
use sitemapper::output::{print_statistics, write_sitemap, write_sitemap_file};
use sitemapper::url::DomainMatch;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitemapper: maps every same-domain page reachable from a seed URL
///
/// Follows hyperlinks from the seed, skipping other domains and binary
/// resources, and prints a sitemaps.org XML document of every page that
/// could be fetched.
#[derive(Parser, Debug)]
#[command(name = "sitemapper")]
#[command(version)]
#[command(about = "Generates a sitemap by crawling a website", long_about = None)]
struct Cli {
    /// The URL of the website to map out
    #[arg(long, value_name = "URL", value_parser = NonEmptyStringValueParser::new())]
    url: String,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write the sitemap to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum number of concurrent fetches per round
    #[arg(long)]
    concurrency: Option<usize>,

    /// Retries for transient fetch failures
    #[arg(long)]
    retries: Option<u32>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Domain comparison mode: strict or prefix
    #[arg(long, value_name = "MODE")]
    domain_match: Option<DomainMatch>,

    /// Print crawl statistics to stderr when done
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    tracing::info!("Mapping site: {}", cli.url);
    let outcome = match sitemapper::crawl(&config, &cli.url).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let eligible = outcome.eligible();
    match &cli.output {
        Some(path) => {
            write_sitemap_file(path, &eligible)
                .with_context(|| format!("failed to write sitemap to {}", path.display()))?;
            tracing::info!("Wrote {} URLs to {}", eligible.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_sitemap(stdout.lock(), &eligible).context("failed to write sitemap")?;
        }
    }

    if cli.stats {
        print_statistics(&outcome.stats);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries the sitemap.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemapper=info,warn"),
            1 => EnvFilter::new("sitemapper=debug,info"),
            2 => EnvFilter::new("sitemapper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_fetches = concurrency;
    }
    if let Some(retries) = cli.retries {
        config.crawler.max_retries = retries;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.request_timeout_secs = timeout;
    }
    if let Some(mode) = cli.domain_match {
        config.crawler.domain_match = mode;
    }

    validate(&config).context("invalid command-line settings")?;
    Ok(config)
}

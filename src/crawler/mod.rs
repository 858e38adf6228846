//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with redirect following and bounded retries
//! - HTML link extraction
//! - Round-based crawl coordination

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{Coordinator, CrawlOutcome, CrawlState};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher, MAX_REDIRECTS};
pub use parser::{extract_links, Link};

use crate::config::Config;
use crate::SitemapError;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for mapping a site. It will:
/// 1. Build the HTTP client from the configuration
/// 2. Resolve the seed URL through redirects
/// 3. Fetch pages round by round, following same-domain links
/// 4. Return the final site map
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The URL to start from
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl completed
/// * `Err(SitemapError)` - The seed was malformed or unreachable, or the
///   client could not be built
pub async fn crawl(config: &Config, seed: &str) -> Result<CrawlOutcome, SitemapError> {
    let fetcher = HttpFetcher::new(config)?;
    Coordinator::new(config, fetcher).run(seed).await
}

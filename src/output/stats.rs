//! Crawl statistics
//!
//! Counters gathered while crawling plus a per-classification breakdown of
//! the final site map.

use crate::state::{Classification, SiteMap};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the crawl reached `Done`
    pub finished_at: Option<DateTime<Utc>>,

    /// Number of rounds executed
    pub rounds: u32,

    /// Number of network fetches performed, seed resolution included
    pub fetches: u64,

    /// Number of hrefs that could not be resolved into a URL
    pub malformed_hrefs: u64,

    /// Number of links extracted from fetched pages
    pub links_found: u64,

    /// Total number of distinct URLs discovered
    pub total_urls: u64,

    /// Count of URLs by classification
    pub urls_by_classification: BTreeMap<Classification, u64>,
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStatistics {
    /// Creates empty statistics stamped with the current time
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            rounds: 0,
            fetches: 0,
            malformed_hrefs: 0,
            links_found: 0,
            total_urls: 0,
            urls_by_classification: BTreeMap::new(),
        }
    }

    /// Records the final site map and the finish time
    pub fn finish(&mut self, site_map: &SiteMap) {
        self.finished_at = Some(Utc::now());
        self.total_urls = site_map.len() as u64;
        self.urls_by_classification = Classification::all()
            .into_iter()
            .map(|kind| (kind, site_map.count(kind) as u64))
            .filter(|(_, count)| *count > 0)
            .collect();
    }

    /// Number of URLs holding `kind`
    pub fn count(&self, kind: Classification) -> u64 {
        self.urls_by_classification
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    /// Wall-clock duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout is reserved for the sitemap document.
pub fn print_statistics(stats: &CrawlStatistics) {
    eprintln!("=== Crawl Statistics ===\n");

    eprintln!("Overview:");
    eprintln!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(duration) = stats.duration_seconds() {
        eprintln!("  Duration: {:.2}s", duration);
    }
    eprintln!("  Rounds: {}", stats.rounds);
    eprintln!("  Fetches: {}", stats.fetches);
    eprintln!("  Links found: {}", stats.links_found);
    eprintln!("  Malformed hrefs: {}", stats.malformed_hrefs);
    eprintln!("  Distinct URLs: {}", stats.total_urls);
    eprintln!();

    eprintln!("URLs by Classification:");
    let mut counts: Vec<_> = stats.urls_by_classification.iter().collect();
    counts.sort_by(|a, b| b.1.cmp(a.1));

    for (kind, count) in counts {
        let percentage = if stats.total_urls > 0 {
            (*count as f64 / stats.total_urls as f64) * 100.0
        } else {
            0.0
        };
        eprintln!("  {}: {} ({:.1}%)", kind, count, percentage);
    }
}

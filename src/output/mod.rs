//! Output module for rendering crawl results
//!
//! This module handles:
//! - Serializing eligible URLs into a sitemap XML document
//! - Recording and printing crawl statistics

pub mod stats;
mod xml;

pub use stats::{print_statistics, CrawlStatistics};
pub use xml::{render_sitemap, write_sitemap, write_sitemap_file, SITEMAP_NAMESPACE};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write XML: {0}")]
    Xml(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

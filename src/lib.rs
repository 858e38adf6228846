//! Sitemapper: a same-domain site crawler that emits sitemap documents
//!
//! Starting from a seed URL, this crate discovers every same-domain, parseable
//! page reachable through hyperlinks, records why every other link was skipped,
//! and renders the reachable pages as a sitemaps.org `urlset` document.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sitemapper operations
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Seed URL {url} is unreachable: {reason}")]
    SeedUnreachable { url: String, reason: String },

    #[error("Invalid state transition for {url}: {from} -> {to}")]
    InvalidTransition {
        url: String,
        from: state::Classification,
        to: state::Classification,
    },

    #[error("URL {0} is not present in the site map")]
    UnknownUrl(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// The href or base could not be parsed as a URL
    #[error("Malformed URL '{url}': {reason}")]
    Parse { url: String, reason: String },

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL: {0}")]
    MissingDomain(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator, CrawlOutcome};
pub use state::{Classification, SiteMap, UrlRecord};
pub use crate::url::{classify, normalize_href, Classifier, SiteDomain};

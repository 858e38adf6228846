//! State module for tracking crawl progress
//!
//! This module provides the in-memory state of a single crawl.
//!
//! # Components
//!
//! - `Classification`: The status of a discovered URL (pending, eligible, skipped, failed)
//! - `SiteMap`: The visited set, one `UrlRecord` per canonical URL
//! - `Frontier`: URLs found in the current round, not yet merged into the site map

mod classification;
mod frontier;
mod site_map;

// Re-export main types
pub use classification::Classification;
pub use frontier::Frontier;
pub use site_map::{SiteMap, UrlRecord};

//! URL handling module for Sitemapper
//!
//! This module provides href resolution, site-domain comparison and the URL
//! classifier that decides which discovered links may be fetched.

mod classify;
mod domain;
mod normalize;

// Re-export main functions
pub use classify::{classify, Classifier, DEFAULT_NOT_PARSEABLE_EXTENSIONS};
pub use domain::{extract_domain, DomainMatch, SiteDomain};
pub use normalize::{canonicalize, normalize, normalize_href};

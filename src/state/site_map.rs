//! The visited set: one record per canonical URL ever discovered
//!
//! The site map is the single source of truth for "have we seen this URL
//! before". It only grows, and every record moves forward through
//! `Pending -> {ExternalDomain | NotParseable}` or
//! `Pending -> visited -> {Eligible | FetchFailed}`.

use crate::state::Classification;
use crate::SitemapError;
use std::collections::BTreeMap;

/// Status of one discovered URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    /// Canonical absolute URL
    pub url: String,

    /// True once a fetch attempt has been made
    pub visited: bool,

    /// Current classification
    pub classification: Classification,
}

impl UrlRecord {
    fn pending(url: &str) -> Self {
        Self {
            url: url.to_string(),
            visited: false,
            classification: Classification::Pending,
        }
    }

    /// Returns true if the record still waits to be classified or fetched
    pub fn is_pending(&self) -> bool {
        !self.visited && self.classification == Classification::Pending
    }
}

/// Mapping from canonical URL to its record
#[derive(Debug, Default, Clone)]
pub struct SiteMap {
    records: BTreeMap<String, UrlRecord>,
}

impl SiteMap {
    /// Creates an empty site map
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a site map seeded with one pending record
    pub fn with_seed(seed: &str) -> Self {
        let mut map = Self::new();
        map.insert(seed);
        map
    }

    /// Returns true if `url` already has a record
    pub fn contains(&self, url: &str) -> bool {
        self.records.contains_key(url)
    }

    /// Creates a pending record for `url` if absent
    ///
    /// Returns true if a new record was created. Inserting a known URL is a
    /// no-op and leaves its record untouched.
    pub fn insert(&mut self, url: &str) -> bool {
        if self.records.contains_key(url) {
            return false;
        }
        self.records.insert(url.to_string(), UrlRecord::pending(url));
        true
    }

    /// Returns the record for `url`, if any
    pub fn get(&self, url: &str) -> Option<&UrlRecord> {
        self.records.get(url)
    }

    /// Marks `url` as visited right before its fetch
    ///
    /// Fails if the URL is unknown, was already visited, or already holds a
    /// terminal classification. This is what guarantees a URL is fetched at
    /// most once.
    pub fn mark_visited(&mut self, url: &str) -> Result<(), SitemapError> {
        let record = self
            .records
            .get_mut(url)
            .ok_or_else(|| SitemapError::UnknownUrl(url.to_string()))?;

        if !record.is_pending() {
            return Err(SitemapError::InvalidTransition {
                url: url.to_string(),
                from: record.classification,
                to: Classification::Pending,
            });
        }

        record.visited = true;
        Ok(())
    }

    /// Sets the terminal classification for `url`
    ///
    /// Skip classifications (`ExternalDomain`, `NotParseable`) are only valid
    /// for unvisited records; fetch outcomes (`Eligible`, `FetchFailed`) only
    /// for visited ones. A record that is already terminal never changes.
    pub fn mark_classification(
        &mut self,
        url: &str,
        kind: Classification,
    ) -> Result<(), SitemapError> {
        let record = self
            .records
            .get_mut(url)
            .ok_or_else(|| SitemapError::UnknownUrl(url.to_string()))?;

        let invalid = record.classification.is_terminal()
            || !kind.is_terminal()
            || kind.requires_visit() != record.visited;

        if invalid {
            return Err(SitemapError::InvalidTransition {
                url: url.to_string(),
                from: record.classification,
                to: kind,
            });
        }

        record.classification = kind;
        Ok(())
    }

    /// Returns every URL that is still pending, in key order
    pub fn pending(&self) -> Vec<String> {
        self.records
            .values()
            .filter(|r| r.is_pending())
            .map(|r| r.url.clone())
            .collect()
    }

    /// Returns every eligible URL, in key order
    pub fn eligible(&self) -> Vec<String> {
        self.with_classification(Classification::Eligible)
    }

    /// Returns every URL holding `kind`, in key order
    pub fn with_classification(&self, kind: Classification) -> Vec<String> {
        self.records
            .values()
            .filter(|r| r.classification == kind)
            .map(|r| r.url.clone())
            .collect()
    }

    /// Counts the records holding `kind`
    pub fn count(&self, kind: Classification) -> usize {
        self.records
            .values()
            .filter(|r| r.classification == kind)
            .count()
    }

    /// Total number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

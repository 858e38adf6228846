use crate::state::Classification;
use crate::url::domain::{DomainMatch, SiteDomain};
use std::collections::HashSet;
use url::Url;

/// File extensions that never lead to a parseable document
pub const DEFAULT_NOT_PARSEABLE_EXTENSIONS: &[&str] = &[
    // Documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt",
    // Images
    "jpg", "jpeg", "png", "gif", "bmp", "svg", "ico", "webp", "tif", "tiff",
    // Binaries
    "exe", "bin", "so", "dll", "dmg", "iso", "deb", "rpm", "msi",
    // Archives
    "zip", "gz", "tgz", "tar", "bz2", "xz", "7z", "rar",
    // Media
    "mp3", "mp4", "avi", "mov", "wav", "ogg", "webm", "flac",
    // Assets
    "js", "css", "woff", "woff2", "ttf", "eot", "map",
];

/// Decides whether a discovered URL may be fetched
///
/// # Decision Order
///
/// 1. Path ends in a not-parseable extension → `NotParseable` (regardless of domain)
/// 2. Scheme/host differ from the site → `ExternalDomain`
/// 3. Otherwise → `Pending`, i.e. an eligible candidate subject to fetch success
#[derive(Debug, Clone)]
pub struct Classifier {
    site: SiteDomain,
    domain_match: DomainMatch,
    extensions: HashSet<String>,
}

impl Classifier {
    /// Creates a classifier with the default extension list and strict matching
    pub fn new(site: SiteDomain) -> Self {
        Self::with_extensions(
            site,
            DomainMatch::Strict,
            DEFAULT_NOT_PARSEABLE_EXTENSIONS.iter().copied(),
        )
    }

    /// Creates a classifier with a custom extension list
    ///
    /// Extensions are matched case-insensitively, with or without a leading dot.
    pub fn with_extensions<I, S>(
        site: SiteDomain,
        domain_match: DomainMatch,
        extensions: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        Self {
            site,
            domain_match,
            extensions,
        }
    }

    pub fn site(&self) -> &SiteDomain {
        &self.site
    }

    /// Classifies a candidate URL
    pub fn classify(&self, candidate: &Url) -> Classification {
        if self.is_not_parseable(candidate) {
            return Classification::NotParseable;
        }

        if !self.site.matches(candidate, self.domain_match) {
            return Classification::ExternalDomain;
        }

        Classification::Pending
    }

    /// Returns true if the last path segment carries a known non-document extension
    pub fn is_not_parseable(&self, candidate: &Url) -> bool {
        path_extension(candidate)
            .map(|ext| self.extensions.contains(&ext))
            .unwrap_or(false)
    }
}

/// Classifies `candidate` with the default extension list and strict matching
pub fn classify(candidate: &Url, site: &SiteDomain) -> Classification {
    Classifier::new(site.clone()).classify(candidate)
}

/// Lowercased extension of the last path segment, if any
fn path_extension(url: &Url) -> Option<String> {
    let last_segment = url.path().rsplit('/').next()?;
    let (stem, ext) = last_segment.rsplit_once('.')?;

    if stem.is_empty() || ext.is_empty() {
        return None;
    }

    Some(ext.to_ascii_lowercase())
}

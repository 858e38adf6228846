/// Classification definitions for discovered URLs
///
/// This module defines every status a URL can hold in the site map.
use std::fmt;

/// Represents the classification of a discovered URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Classification {
    // ===== Active States =====
    /// URL has been discovered but not yet classified or fetched
    Pending,

    // ===== Terminal Success States =====
    /// URL is in-domain, parseable, and was fetched successfully
    Eligible,

    // ===== Terminal Skip States =====
    /// URL points outside the site's scheme and host - recorded, never fetched
    ExternalDomain,

    /// URL points at a binary or non-document resource - recorded, never fetched
    NotParseable,

    // ===== Terminal Error States =====
    /// Fetch was attempted and failed (transport error or non-2xx status)
    FetchFailed,
}

impl Classification {
    /// Returns true if this is a terminal classification
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if the URL belongs in the sitemap document
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }

    /// Returns true if this classification is reached without fetching
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::ExternalDomain | Self::NotParseable)
    }

    /// Returns true if this classification is only reached after a fetch attempt
    pub fn requires_visit(&self) -> bool {
        match self {
            Self::Eligible | Self::FetchFailed => true,
            Self::Pending | Self::ExternalDomain | Self::NotParseable => false,
        }
    }

    /// Returns the lowercase label used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Eligible => "eligible",
            Self::ExternalDomain => "external_domain",
            Self::NotParseable => "not_parseable",
            Self::FetchFailed => "fetch_failed",
        }
    }

    /// Returns all possible classifications
    pub fn all() -> [Self; 5] {
        [
            Self::Pending,
            Self::Eligible,
            Self::ExternalDomain,
            Self::NotParseable,
            Self::FetchFailed,
        ]
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

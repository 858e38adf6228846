use crate::UrlError;
use serde::Deserialize;
use std::fmt;
use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (e.g. `mailto:` links), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemapper::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("mailto:someone@example.com").unwrap();
/// assert_eq!(extract_domain(&url), None);
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// How a candidate URL is compared against the site domain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainMatch {
    /// Scheme, host and port must all be equal
    #[default]
    Strict,

    /// Candidate origin only has to start with the site origin
    ///
    /// Accepts `https://a.com.evil.com` for a site on `https://a.com`.
    Prefix,
}

impl std::str::FromStr for DomainMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "prefix" => Ok(Self::Prefix),
            other => Err(format!(
                "unknown domain match mode '{}', expected 'strict' or 'prefix'",
                other
            )),
        }
    }
}

/// Scheme and authority of the site being mapped
///
/// Built from the redirect-resolved seed URL. Path and query are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDomain {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl SiteDomain {
    /// Builds the site domain from an absolute URL
    pub fn from_url(url: &Url) -> Result<Self, UrlError> {
        let host = extract_domain(url).ok_or_else(|| UrlError::MissingDomain(url.to_string()))?;

        Ok(Self {
            scheme: url.scheme().to_ascii_lowercase(),
            host,
            port: url.port_or_known_default(),
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// `scheme://host[:port]` with default ports omitted
    pub fn origin(&self) -> String {
        origin_string(&self.scheme, &self.host, self.port)
    }

    /// Returns true if `candidate` belongs to this site under `mode`
    ///
    /// Host comparison is case-insensitive. URLs without a host never match.
    pub fn matches(&self, candidate: &Url, mode: DomainMatch) -> bool {
        let Some(host) = extract_domain(candidate) else {
            return false;
        };
        let scheme = candidate.scheme().to_ascii_lowercase();
        let port = candidate.port_or_known_default();

        match mode {
            DomainMatch::Strict => {
                scheme == self.scheme && host == self.host && port == self.port
            }
            DomainMatch::Prefix => {
                origin_string(&scheme, &host, port).starts_with(&self.origin())
            }
        }
    }
}

impl fmt::Display for SiteDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.origin())
    }
}

fn origin_string(scheme: &str, host: &str, port: Option<u16>) -> String {
    let default_port = match scheme {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    };

    match port {
        Some(p) if Some(p) != default_port => format!("{}://{}:{}", scheme, host, p),
        _ => format!("{}://{}", scheme, host),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(url: &str) -> SiteDomain {
        SiteDomain::from_url(&Url::parse(url).unwrap()).unwrap()
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_extract_uppercase_converted_to_lowercase() {
        let url = Url::parse("https://EXAMPLE.COM/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_site_ignores_path_and_query() {
        let s = site("https://a.com/blog/index.html?x=1");
        assert_eq!(s.origin(), "https://a.com");
        assert!(s.matches(&url("https://a.com/"), DomainMatch::Strict));
    }

    #[test]
    fn test_origin_keeps_non_default_port() {
        assert_eq!(site("http://127.0.0.1:8080/").origin(), "http://127.0.0.1:8080");
        assert_eq!(site("http://a.com:80/").origin(), "http://a.com");
    }

    #[test]
    fn test_strict_host_case_insensitive() {
        let s = site("https://a.com/");
        assert!(s.matches(&url("https://A.COM/About"), DomainMatch::Strict));
    }

    #[test]
    fn test_strict_rejects_other_host_scheme_port() {
        let s = site("https://a.com/");
        assert!(!s.matches(&url("https://b.com/x"), DomainMatch::Strict));
        assert!(!s.matches(&url("http://a.com/x"), DomainMatch::Strict));
        assert!(!s.matches(&url("https://a.com:8443/x"), DomainMatch::Strict));
        assert!(!s.matches(&url("https://a.com.evil.com/"), DomainMatch::Strict));
        assert!(!s.matches(&url("https://sub.a.com/"), DomainMatch::Strict));
    }

    #[test]
    fn test_prefix_is_lenient() {
        let s = site("https://a.com/");
        assert!(s.matches(&url("https://a.com/x"), DomainMatch::Prefix));
        assert!(s.matches(&url("https://a.com.evil.com/"), DomainMatch::Prefix));
        assert!(!s.matches(&url("https://b.com/"), DomainMatch::Prefix));
    }

    #[test]
    fn test_hostless_never_matches() {
        let s = site("https://a.com/");
        assert!(!s.matches(&url("mailto:me@a.com"), DomainMatch::Strict));
        assert!(!s.matches(&url("mailto:me@a.com"), DomainMatch::Prefix));
    }

    #[test]
    fn test_domain_match_from_str() {
        assert_eq!("strict".parse::<DomainMatch>(), Ok(DomainMatch::Strict));
        assert_eq!("PREFIX".parse::<DomainMatch>(), Ok(DomainMatch::Prefix));
        assert!("loose".parse::<DomainMatch>().is_err());
    }
}

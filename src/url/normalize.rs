use crate::UrlError;
use url::{ParseError, Url};

/// Resolves an href found on a page into an absolute URL
///
/// # Resolution Rules
///
/// 1. Hrefs that already carry a scheme are used as-is (only parsed)
/// 2. Everything else is resolved against `base` per RFC 3986 §5:
///    - `/about.html` replaces the path on the base authority
///    - `x` and `../x` resolve against the directory of the base path
///    - `#section` yields the base URL plus the fragment
/// 3. Trailing slashes are kept
///
/// # Arguments
///
/// * `href` - The raw href attribute value
/// * `base` - The URL of the page the href was found on
///
/// # Returns
///
/// * `Ok(Url)` - Absolute URL
/// * `Err(UrlError::Parse)` - The href cannot be resolved into a URL
///
/// # Examples
///
/// ```
/// use sitemapper::url::normalize_href;
/// use url::Url;
///
/// let base = Url::parse("https://a.com/blog/post").unwrap();
/// assert_eq!(normalize_href("/about.html", &base).unwrap().as_str(), "https://a.com/about.html");
/// assert_eq!(normalize_href("../x", &base).unwrap().as_str(), "https://a.com/x");
/// ```
pub fn normalize_href(href: &str, base: &Url) -> Result<Url, UrlError> {
    let href = href.trim();

    match Url::parse(href) {
        Ok(absolute) => Ok(absolute),
        Err(ParseError::RelativeUrlWithoutBase) => base.join(href).map_err(|e| UrlError::Parse {
            url: href.to_string(),
            reason: e.to_string(),
        }),
        Err(e) => Err(UrlError::Parse {
            url: href.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Same as [`normalize_href`] but with the base given as a string
///
/// Fails with `UrlError::Parse` if the base itself is not an absolute URL.
pub fn normalize(href: &str, base: &str) -> Result<Url, UrlError> {
    let base = Url::parse(base).map_err(|e| UrlError::Parse {
        url: base.to_string(),
        reason: e.to_string(),
    })?;
    normalize_href(href, &base)
}

/// Turns a resolved URL into the key used by the site map
///
/// The fragment is dropped so in-page anchors coincide with their page. Path
/// and trailing slash are left untouched.
pub fn canonicalize(url: &Url) -> Url {
    let mut canonical = url.clone();
    canonical.set_fragment(None);
    canonical
}

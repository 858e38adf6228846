//! HTML link extraction
//!
//! Returns every anchor of a document as an `(href, text)` pair in document
//! order. Parsing never fails: malformed markup yields whatever links the
//! HTML5 parser recovers.

use scraper::{Html, Selector};

/// An anchor found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// The raw `href` attribute value, unresolved
    pub href: String,

    /// The anchor's text content with whitespace collapsed
    pub text: String,
}

/// Extracts all `<a href="...">` links from an HTML body
///
/// The body is decoded as UTF-8, replacing invalid sequences. Hrefs are
/// returned exactly as written; resolution is left to the caller.
///
/// # Example
///
/// ```
/// use sitemapper::crawler::extract_links;
///
/// let html = br#"<p><a href="/about.html">About <b>us</b></a></p>"#;
/// let links = extract_links(html);
/// assert_eq!(links[0].href, "/about.html");
/// assert_eq!(links[0].text, "About us");
/// ```
pub fn extract_links(body: &[u8]) -> Vec<Link> {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let text = element
                .text()
                .flat_map(|t| t.split_whitespace())
                .collect::<Vec<_>>()
                .join(" ");

            Some(Link {
                href: href.to_string(),
                text,
            })
        })
        .collect()
}

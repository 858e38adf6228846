//! Sitemap XML serializer
//!
//! Emits a sitemaps.org `urlset` document:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//!  <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url><loc>https://example.com/</loc></url>
//!  </urlset>
//! ```

use crate::output::OutputError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Namespace of the sitemap protocol
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Writes a sitemap containing `urls` to `sink`
///
/// Each URL becomes one `<url><loc>` entry, in the given order. Markup
/// characters in URLs are escaped.
pub fn write_sitemap<W, I, S>(sink: W, urls: I) -> Result<(), OutputError>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut writer = Writer::new(sink);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    emit(&mut writer, Event::Text(BytesText::new("\n ")))?;
    emit(
        &mut writer,
        Event::Start(BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NAMESPACE)])),
    )?;

    for url in urls {
        emit(&mut writer, Event::Text(BytesText::new("\n  ")))?;
        emit(&mut writer, Event::Start(BytesStart::new("url")))?;
        emit(&mut writer, Event::Start(BytesStart::new("loc")))?;
        emit(&mut writer, Event::Text(BytesText::new(url.as_ref())))?;
        emit(&mut writer, Event::End(BytesEnd::new("loc")))?;
        emit(&mut writer, Event::End(BytesEnd::new("url")))?;
    }

    emit(&mut writer, Event::Text(BytesText::new("\n ")))?;
    emit(&mut writer, Event::End(BytesEnd::new("urlset")))?;

    let mut sink = writer.into_inner();
    sink.write_all(b"\n")?;
    sink.flush()?;
    Ok(())
}

/// Renders a sitemap into a string
pub fn render_sitemap<I, S>(urls: I) -> Result<String, OutputError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut buffer = Vec::new();
    write_sitemap(&mut buffer, urls)?;
    String::from_utf8(buffer).map_err(|e| OutputError::Xml(e.to_string()))
}

/// Writes a sitemap to a file, replacing any existing content
pub fn write_sitemap_file<I, S>(path: &Path, urls: I) -> Result<(), OutputError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let file = File::create(path)?;
    write_sitemap(BufWriter::new(file), urls)
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), OutputError> {
    writer
        .write_event(event)
        .map_err(|e| OutputError::Xml(e.to_string()))
}

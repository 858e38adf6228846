//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use sitemapper::config::Config;
use sitemapper::crawler::{crawl, Coordinator, FetchError, FetchedPage, Fetcher, HttpFetcher};
use sitemapper::output::render_sitemap;
use sitemapper::{Classification, SitemapError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.request_timeout_secs = 5;
    config.crawler.connect_timeout_secs = 2;
    config.crawler.retry_delay_ms = 10;
    config
}

fn html_page(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

/// Wraps the HTTP fetcher and counts requests per URL
struct CountingFetcher {
    inner: HttpFetcher,
    counts: Mutex<HashMap<String, usize>>,
}

impl CountingFetcher {
    fn new(config: &Config) -> Self {
        Self {
            inner: HttpFetcher::new(config).expect("Failed to build fetcher"),
            counts: Mutex::new(HashMap::new()),
        }
    }

    fn counts(&self) -> HashMap<String, usize> {
        self.counts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for CountingFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        *self
            .counts
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default() += 1;
        self.inner.fetch(url).await
    }
}

#[tokio::test]
async fn test_end_to_end_sitemap() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/about.html">About</a>
               <a href="https://b.example/other">Other</a>
               <a href="report.pdf">Report</a>"#
                .to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about.html"))
        .respond_with(html_page("No further links".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Never fetched: classified from its extension alone
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x25, 0x50, 0x44, 0x46]))
        .expect(0)
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", base_url);
    let outcome = crawl(&create_test_config(), &seed)
        .await
        .expect("Crawl failed");

    let home = format!("{}/", base_url);
    let about = format!("{}/about.html", base_url);
    let report = format!("{}/report.pdf", base_url);

    assert_eq!(outcome.site_map.len(), 4);
    assert_eq!(outcome.eligible(), vec![home.clone(), about.clone()]);
    assert_eq!(
        outcome.site_map.get("https://b.example/other").unwrap().classification,
        Classification::ExternalDomain
    );
    assert_eq!(
        outcome.site_map.get(&report).unwrap().classification,
        Classification::NotParseable
    );
    assert!(!outcome.site_map.get(&report).unwrap().visited);

    let xml = render_sitemap(outcome.eligible()).unwrap();
    assert_eq!(xml.matches("<loc>").count(), 2);
    assert!(xml.contains(&format!("<loc>{}</loc>", home)));
    assert!(xml.contains(&format!("<loc>{}</loc>", about)));
    assert!(!xml.contains("b.example"));
    assert!(!xml.contains("report.pdf"));
}

#[tokio::test]
async fn test_cyclic_links_fetch_each_page_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(format!(
            r##"<a href="{}/a/">A</a><a href="/b.html">B</a><a href="#top">Top</a>"##,
            base_url
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a/"))
        .respond_with(html_page(
            r#"<a href="../b.html">B</a><a href="/">Home</a><a href="child.html">Child</a>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a/child.html"))
        .respond_with(html_page(r#"<a href="/a/">Up</a>"#.to_string()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b.html"))
        .respond_with(html_page(r#"<a href="/">Home</a><a href="/a/">A</a>"#.to_string()))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config();
    config.crawler.max_concurrent_fetches = 4;
    let fetcher = Arc::new(CountingFetcher::new(&config));
    let coordinator = Coordinator::new(&config, Arc::clone(&fetcher));

    let outcome = coordinator
        .run(&format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.site_map.len(), 4);
    assert_eq!(outcome.eligible().len(), 4);

    let counts = fetcher.counts();
    assert_eq!(counts.len(), 4);
    for (url, count) in counts {
        assert_eq!(count, 1, "{} was fetched {} times", url, count);
    }
}

#[tokio::test]
async fn test_fetch_failure_does_not_abort_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/missing.html">Missing</a><a href="/broken.html">Broken</a><a href="/ok.html">Ok</a>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok.html"))
        .respond_with(html_page("fine".to_string()))
        .mount(&mock_server)
        .await;

    let outcome = crawl(&create_test_config(), &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    for failed in ["/missing.html", "/broken.html"] {
        let record = outcome
            .site_map
            .get(&format!("{}{}", base_url, failed))
            .unwrap();
        assert!(record.visited);
        assert_eq!(record.classification, Classification::FetchFailed);
    }
    assert_eq!(
        outcome.eligible(),
        vec![format!("{}/", base_url), format!("{}/ok.html", base_url)]
    );
    assert_eq!(outcome.stats.count(Classification::FetchFailed), 2);
}

#[tokio::test]
async fn test_retry_recovers_transient_failure() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/flaky.html">Flaky</a>"#.to_string()))
        .mount(&mock_server)
        .await;

    // First attempt fails, the retry succeeds
    Mock::given(method("GET"))
        .and(path("/flaky.html"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky.html"))
        .respond_with(html_page("recovered".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config();
    config.crawler.max_retries = 2;

    let outcome = crawl(&config, &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(
        outcome
            .site_map
            .get(&format!("{}/flaky.html", base_url))
            .unwrap()
            .classification,
        Classification::Eligible
    );
}

#[tokio::test]
async fn test_retries_exhausted_stays_fetch_failed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/down.html">Down</a>"#.to_string()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/down.html"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config();
    config.crawler.max_retries = 2;

    let outcome = crawl(&config, &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(
        outcome
            .site_map
            .get(&format!("{}/down.html", base_url))
            .unwrap()
            .classification,
        Classification::FetchFailed
    );
}

#[tokio::test]
async fn test_seed_redirect_is_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/home/", base_url).as_str()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // Fetched once for seed resolution, reused by the first round
    Mock::given(method("GET"))
        .and(path("/home/"))
        .respond_with(html_page(r#"<a href="intro.html">Intro</a>"#.to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/home/intro.html"))
        .respond_with(html_page("intro".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = crawl(&create_test_config(), &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.seed.as_str(), format!("{}/home/", base_url));
    assert_eq!(
        outcome.eligible(),
        vec![
            format!("{}/home/", base_url),
            format!("{}/home/intro.html", base_url)
        ]
    );
}

#[tokio::test]
async fn test_directory_redirect_resolves_relative_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/docs">Docs</a>"#.to_string()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/docs/", base_url).as_str()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/"))
        .respond_with(html_page(r#"<a href="intro.html">Intro</a>"#.to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/intro.html"))
        .respond_with(html_page("intro".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/intro.html"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&mock_server)
        .await;

    let outcome = crawl(&create_test_config(), &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(
        outcome.eligible(),
        vec![
            format!("{}/", base_url),
            format!("{}/docs", base_url),
            format!("{}/docs/intro.html", base_url)
        ]
    );
}

#[tokio::test]
async fn test_unreachable_seed_is_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = crawl(&create_test_config(), &format!("{}/", base_url)).await;

    match result {
        Err(SitemapError::SeedUnreachable { url, reason }) => {
            assert_eq!(url, format!("{}/", base_url));
            assert!(reason.contains("404"), "unexpected reason: {}", reason);
        }
        other => panic!("Expected SeedUnreachable, got {:?}", other.map(|o| o.eligible())),
    }
}

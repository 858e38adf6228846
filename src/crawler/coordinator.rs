//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the round-based crawl loop:
//! - `Init`: resolve the seed through redirects and seed the site map
//! - `Running`: classify every pending URL, fetch the eligible candidates,
//!   extract and resolve their links, merge new URLs into the site map
//! - `Done`: no pending URL remains; the eligible set is final

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{FetchError, FetchedPage, Fetcher};
use crate::crawler::parser::extract_links;
use crate::output::CrawlStatistics;
use crate::state::{Classification, Frontier, SiteMap};
use crate::url::{canonicalize, normalize_href, Classifier, SiteDomain};
use crate::{SitemapError, UrlError};
use futures::stream::{self, StreamExt};
use url::Url;

/// Lifecycle of a single crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Init,
    Running,
    Done,
}

/// Everything one crawl invocation owns
///
/// Nothing here is shared between crawls, so a coordinator can run any
/// number of independent crawls.
struct CrawlSession {
    state: CrawlState,
    seed: Url,
    classifier: Classifier,
    site_map: SiteMap,
    frontier: Frontier,
    /// Seed page fetched during `Init`, consumed by the first round
    prefetched: Option<(Url, FetchedPage)>,
    stats: CrawlStatistics,
}

/// Result of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Canonical starting URL after redirects
    pub seed: Url,

    /// Domain every discovered URL was compared against
    pub site: SiteDomain,

    /// Final state of every discovered URL
    pub site_map: SiteMap,

    pub stats: CrawlStatistics,
}

impl CrawlOutcome {
    /// URLs to list in the sitemap document
    pub fn eligible(&self) -> Vec<String> {
        self.site_map.eligible()
    }
}

/// Per-round counters, logged at the end of each round
#[derive(Debug, Default)]
struct RoundSummary {
    skipped: usize,
    fetched: usize,
    failed: usize,
    added: usize,
}

/// Main crawler coordinator structure
pub struct Coordinator<F> {
    config: CrawlerConfig,
    fetcher: F,
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `fetcher` - The fetch collaborator used for every request
    pub fn new(config: &Config, fetcher: F) -> Self {
        Self {
            config: config.crawler.clone(),
            fetcher,
        }
    }

    /// Crawls the site behind `seed` until no pending URL remains
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - Crawl reached `Done`
    /// * `Err(SitemapError::SeedUnreachable)` - The seed could not be fetched
    /// * `Err(SitemapError::Url)` - The seed is not an absolute HTTP(S) URL
    pub async fn run(&self, seed: &str) -> Result<CrawlOutcome, SitemapError> {
        let mut session = self.init(seed).await?;
        tracing::info!(
            "Mapping site {} starting at {}",
            session.classifier.site(),
            session.seed
        );

        while session.state == CrawlState::Running {
            self.run_round(&mut session).await?;
        }

        session.stats.finish(&session.site_map);
        tracing::info!(
            "Crawl completed: {} URLs discovered, {} eligible, {} rounds, {} fetches",
            session.site_map.len(),
            session.site_map.count(Classification::Eligible),
            session.stats.rounds,
            session.stats.fetches
        );

        Ok(CrawlOutcome {
            seed: session.seed,
            site: session.classifier.site().clone(),
            site_map: session.site_map,
            stats: session.stats,
        })
    }

    /// `Init`: resolves the seed and seeds the site map with one pending record
    async fn init(&self, seed: &str) -> Result<CrawlSession, SitemapError> {
        let seed = seed.trim();
        let seed_url = Url::parse(seed).map_err(|e| UrlError::Parse {
            url: seed.to_string(),
            reason: e.to_string(),
        })?;

        if seed_url.scheme() != "http" && seed_url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS seeds are supported, got: {}",
                seed_url.scheme()
            ))
            .into());
        }

        let mut stats = CrawlStatistics::new();
        stats.fetches += 1;

        let page = self.fetcher.fetch(&seed_url).await.map_err(|e| {
            tracing::error!("Seed {} is unreachable: {}", seed_url, e);
            SitemapError::SeedUnreachable {
                url: seed_url.to_string(),
                reason: e.to_string(),
            }
        })?;

        let start = canonicalize(&page.final_url);
        if start != canonicalize(&seed_url) {
            tracing::info!("Seed {} redirected to {}", seed_url, start);
        }

        let site = SiteDomain::from_url(&start)?;
        let classifier = Classifier::with_extensions(
            site,
            self.config.domain_match,
            &self.config.not_parseable_extensions,
        );

        Ok(CrawlSession {
            state: CrawlState::Running,
            site_map: SiteMap::with_seed(start.as_str()),
            seed: start.clone(),
            classifier,
            frontier: Frontier::new(),
            prefetched: Some((start, page)),
            stats,
        })
    }

    /// `Running`: processes the current pending set as one round
    ///
    /// Fetches run concurrently up to the configured limit; their outcomes
    /// are applied to the site map only after every fetch of the round has
    /// completed.
    async fn run_round(&self, session: &mut CrawlSession) -> Result<(), SitemapError> {
        let pending = session.site_map.pending();
        if pending.is_empty() {
            tracing::debug!("No pending URLs left");
            session.state = CrawlState::Done;
            return Ok(());
        }

        session.stats.rounds += 1;
        let round = session.stats.rounds;
        tracing::debug!("Round {}: {} pending URLs", round, pending.len());

        let mut summary = RoundSummary::default();
        let mut to_fetch = Vec::new();

        for key in pending {
            let url = Url::parse(&key)?;
            match session.classifier.classify(&url) {
                Classification::Pending => {
                    session.site_map.mark_visited(&key)?;
                    to_fetch.push(url);
                }
                kind => {
                    tracing::debug!("Skipping {} ({})", key, kind);
                    session.site_map.mark_classification(&key, kind)?;
                    summary.skipped += 1;
                }
            }
        }

        let mut outcomes: Vec<(Url, Result<FetchedPage, FetchError>)> =
            Vec::with_capacity(to_fetch.len());

        if let Some((seed, page)) = session.prefetched.take() {
            if let Some(pos) = to_fetch.iter().position(|u| *u == seed) {
                to_fetch.swap_remove(pos);
                outcomes.push((seed, Ok(page)));
            }
        }

        session.stats.fetches += to_fetch.len() as u64;

        let fetcher = &self.fetcher;
        let fetched: Vec<_> = stream::iter(to_fetch)
            .map(move |url| async move {
                tracing::debug!("Fetching {}", url);
                let result = fetcher.fetch(&url).await;
                (url, result)
            })
            .buffer_unordered(self.config.max_concurrent_fetches.max(1))
            .collect()
            .await;
        outcomes.extend(fetched);

        for (url, result) in outcomes {
            match result {
                Ok(page) => match session.classifier.classify(&canonicalize(&page.final_url)) {
                    Classification::Pending => {
                        tracing::debug!(
                            "Fetched {} (HTTP {}, {} bytes)",
                            page.final_url,
                            page.status_code,
                            page.body.len()
                        );
                        self.handle_page(session, &page);
                        session
                            .site_map
                            .mark_classification(url.as_str(), Classification::Eligible)?;
                        summary.fetched += 1;
                    }
                    kind => {
                        tracing::warn!(
                            "{} redirected to {} ({}), ignoring its content",
                            url,
                            page.final_url,
                            kind
                        );
                        session
                            .site_map
                            .mark_classification(url.as_str(), Classification::FetchFailed)?;
                        summary.failed += 1;
                    }
                },
                Err(e) => {
                    tracing::warn!("Fetch failed for {}: {}", url, e);
                    session
                        .site_map
                        .mark_classification(url.as_str(), Classification::FetchFailed)?;
                    summary.failed += 1;
                }
            }
        }

        tracing::debug!("Merging {} discovered links", session.frontier.len());
        for url in session.frontier.drain() {
            if session.site_map.insert(url.as_str()) {
                tracing::debug!("Adding new URL: {}", url);
                summary.added += 1;
            } else {
                tracing::trace!("Duplicate URL: {}", url);
            }
        }

        tracing::info!(
            "Round {} done: {} fetched, {} failed, {} skipped, {} new URLs",
            round,
            summary.fetched,
            summary.failed,
            summary.skipped,
            summary.added
        );

        Ok(())
    }

    /// Extracts the links of a fetched page and queues them on the frontier
    ///
    /// Hrefs are resolved against the URL the page was served from after
    /// redirects. Unresolvable hrefs are logged and skipped.
    fn handle_page(&self, session: &mut CrawlSession, page: &FetchedPage) {
        let url = &page.final_url;
        let links = extract_links(&page.body);
        session.stats.links_found += links.len() as u64;

        for link in links {
            match normalize_href(&link.href, url) {
                Ok(resolved) => {
                    tracing::trace!("Found link {} ({:?}) on {}", resolved, link.text, url);
                    session.frontier.push(canonicalize(&resolved));
                }
                Err(e) => {
                    tracing::warn!("Skipping href on {}: {}", url, e);
                    session.stats.malformed_hrefs += 1;
                }
            }
        }
    }
}

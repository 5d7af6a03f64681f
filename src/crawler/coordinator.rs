//! Crawler coordinator - product discovery loop
//!
//! Visits pages breadth-first from the seed URL, one request at a time,
//! collecting every same-host product link seen along the way. Fetch failures
//! are logged and the page contributes nothing.

use crate::config::Config;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{extract_links, LinkRules};
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::site::SiteProfile;
use crate::url::normalize_url;
use crate::{HarvestError, UrlError};
use reqwest::Client;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use url::Url;

/// What a finished crawl found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Deduplicated product URLs
    pub product_urls: BTreeSet<String>,

    /// Pages dequeued and fetched, including failed fetches
    pub pages_visited: usize,
}

/// Bounded breadth-first product discoverer
pub struct FrontierCrawler {
    client: Client,
    seed: Url,
    link_selector: String,
    product_marker: String,
    max_pages: usize,
    max_depth: Option<u32>,
    request_delay: Duration,
}

impl FrontierCrawler {
    /// Creates a crawler for the configured start URL and site profile
    ///
    /// `crawler.product-path-marker` overrides the profile's marker when set.
    ///
    /// # Returns
    ///
    /// * `Ok(FrontierCrawler)` - Ready to crawl
    /// * `Err(HarvestError)` - Start URL rejected or HTTP client could not be built
    pub fn new(config: &Config, profile: &SiteProfile) -> Result<Self, HarvestError> {
        let seed = Url::parse(config.crawler.start_url.trim())
            .map_err(|e| UrlError::Parse(e.to_string()))?;
        // Rejects non-HTTP and hostless seeds
        normalize_url(seed.as_str())?;

        let client = build_http_client(
            &config.user_agent,
            Duration::from_millis(config.crawler.request_timeout),
        )?;

        let product_marker = config
            .crawler
            .product_path_marker
            .clone()
            .unwrap_or_else(|| profile.product_path_marker.to_string());

        Ok(Self {
            client,
            seed,
            link_selector: profile.link_selector.to_string(),
            product_marker,
            max_pages: config.crawler.max_pages,
            max_depth: config.crawler.max_depth,
            request_delay: Duration::from_millis(config.crawler.request_delay),
        })
    }

    /// The HTTP client, shared with the field scraper
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Runs the crawl to completion
    ///
    /// Stops when the frontier is empty or the page budget is spent,
    /// whichever comes first.
    pub async fn crawl(&self) -> CrawlOutcome {
        tracing::info!(
            "Starting product discovery from {} (budget {} pages, depth {})",
            self.seed,
            self.max_pages,
            self.max_depth
                .map(|d| d.to_string())
                .unwrap_or_else(|| "unlimited".to_string())
        );

        let rules = LinkRules {
            seed: &self.seed,
            link_selector: &self.link_selector,
            product_marker: &self.product_marker,
        };

        let mut frontier = Frontier::new(self.seed.clone(), self.max_pages, self.max_depth);
        let mut product_urls = BTreeSet::new();
        let start_time = Instant::now();

        while let Some(task) = frontier.next_task() {
            if frontier.visited_count() > 1 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            tracing::info!("Crawling: {}", task.url);

            let (final_url, body) = match fetch_url(&self.client, task.url.as_str()).await {
                FetchResult::Success {
                    final_url, body, ..
                } => (final_url, body),
                FetchResult::HttpError { status_code } => {
                    tracing::warn!("Error crawling {}: HTTP {}", task.url, status_code);
                    continue;
                }
                FetchResult::NetworkError { error } => {
                    tracing::warn!("Error crawling {}: {}", task.url, error);
                    continue;
                }
            };

            // Relative links resolve against where the page ended up after redirects
            let base = Url::parse(&final_url).unwrap_or_else(|_| task.url.clone());
            let links = extract_links(&body, &base, &rules);
            tracing::debug!(
                "{}: {} product links, {} traversable links",
                task.url,
                links.products.len(),
                links.traversable.len()
            );

            for product in links.products {
                if product_urls.insert(product.to_string()) {
                    tracing::debug!("Found product {}", product);
                }
            }

            for link in links.traversable {
                frontier.enqueue(link, task.depth);
            }
        }

        if frontier.budget_spent() {
            tracing::info!(
                "Page budget of {} reached, dropping {} queued URLs",
                self.max_pages,
                frontier.queued()
            );
        }

        tracing::info!(
            "Discovery completed: {} pages crawled, {} product URLs in {:?}",
            frontier.visited_count(),
            product_urls.len(),
            start_time.elapsed()
        );

        CrawlOutcome {
            product_urls,
            pages_visited: frontier.visited_count(),
        }
    }
}

/// Runs product discovery for a configuration
pub async fn discover_products(
    config: &Config,
    profile: &SiteProfile,
) -> Result<CrawlOutcome, HarvestError> {
    let crawler = FrontierCrawler::new(config, profile)?;
    Ok(crawler.crawl().await)
}

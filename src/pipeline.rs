//! End-to-end harvest: discover product URLs, then collect each product
//!
//! ```text
//! FrontierCrawler ──> product URLs ──┬─> PaginatedExtractor (browser) ─┐
//!                                    └─> field scrape (HTTP) ──────────┴─> ProductRecord ─> Sink
//! ```
//!
//! Products are processed one after another over a single browser session.
//! Only a failure to start that session, or to write the sink, ends the run
//! with an error.

use crate::config::Config;
use crate::crawler::{fetch_url, CrawlOutcome, FetchResult, FrontierCrawler};
use crate::extract::{scrape_product_fields, PaginatedExtractor};
use crate::model::{ProductFields, ProductRecord};
use crate::output::{HarvestStatistics, Sink};
use crate::render::{run_scoped, RenderSession, WebDriverSession};
use crate::site::SiteProfile;
use crate::HarvestError;
use std::collections::BTreeSet;

/// A configured harvest run
pub struct Pipeline<'a> {
    config: &'a Config,
    profile: &'static SiteProfile,
    crawler: FrontierCrawler,
}

impl<'a> Pipeline<'a> {
    /// Prepares a run for `config`
    ///
    /// Fails only if the start URL is unusable or the HTTP client cannot be
    /// built; the browser is not contacted yet.
    pub fn new(config: &'a Config) -> Result<Self, HarvestError> {
        let profile = SiteProfile::for_kind(config.crawler.site);
        let crawler = FrontierCrawler::new(config, profile)?;

        Ok(Self {
            config,
            profile,
            crawler,
        })
    }

    /// Runs the frontier crawler and records its counters
    pub async fn discover(&self, stats: &mut HarvestStatistics) -> CrawlOutcome {
        let outcome = self.crawler.crawl().await;
        stats.pages_visited = outcome.pages_visited;
        stats.product_urls_found = outcome.product_urls.len();
        outcome
    }

    /// Builds one record per product URL, in URL order
    pub async fn collect<S>(&self, session: &S, urls: &BTreeSet<String>) -> Vec<ProductRecord>
    where
        S: RenderSession + ?Sized,
    {
        let extractor = PaginatedExtractor::new(self.profile, &self.config.render);
        let mut records = Vec::with_capacity(urls.len());

        for (index, url) in urls.iter().enumerate() {
            tracing::info!("Processing ({}/{}): {}", index + 1, urls.len(), url);

            let extraction = extractor.extract(session, url).await;
            tracing::debug!(
                "{}: {} reviews over {} pages, ended with {:?}",
                url,
                extraction.reviews.len(),
                extraction.pages,
                extraction.end
            );

            let fields = self.scrape_fields(url).await;
            let record = ProductRecord::new(url.as_str(), fields, extraction.reviews);

            tracing::info!("Product Name: {}", record.name);
            tracing::info!("Price: {}", record.price);
            tracing::info!("Total Reviews Found: {}", record.review_count);

            records.push(record);
        }

        records
    }

    /// Fetches a product page over HTTP and reads its name and price
    ///
    /// A failed fetch yields both sentinels rather than an error.
    pub async fn scrape_fields(&self, url: &str) -> ProductFields {
        match fetch_url(self.crawler.client(), url).await {
            FetchResult::Success { body, .. } => scrape_product_fields(&body, &self.profile.product),
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Error fetching product page {}: HTTP {}", url, status_code);
                ProductFields::missing()
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Error fetching product page {}: {}", url, error);
                ProductFields::missing()
            }
        }
    }

    /// Collects every discovered product through `session` and writes the sink
    ///
    /// The session is quit before this returns, whatever the outcome.
    pub async fn harvest<S>(
        &self,
        outcome: CrawlOutcome,
        session: S,
        sink: &dyn Sink,
        mut stats: HarvestStatistics,
    ) -> Result<HarvestStatistics, HarvestError>
    where
        S: RenderSession + 'static,
    {
        let urls = outcome.product_urls;
        let records = run_scoped(session, |session| async move {
            Ok(self.collect(session.as_ref(), &urls).await)
        })
        .await?;

        for record in &records {
            stats.record_product(record);
        }

        sink.write_records(&records)?;
        stats.finish();

        tracing::info!(
            "Harvest completed: {} products, {} reviews, written to {}",
            stats.products_processed,
            stats.reviews_collected,
            sink.describe()
        );

        Ok(stats)
    }

    /// Discovers and harvests using an already open session
    pub async fn run_with_session<S>(
        &self,
        session: S,
        sink: &dyn Sink,
    ) -> Result<HarvestStatistics, HarvestError>
    where
        S: RenderSession + 'static,
    {
        let mut stats = HarvestStatistics::start();
        let outcome = self.discover(&mut stats).await;
        self.harvest(outcome, session, sink, stats).await
    }
}

/// Runs a full harvest against a WebDriver-controlled browser
///
/// Product discovery happens before the browser is started. A browser that
/// cannot be started ends the run without writing anything.
pub async fn run(config: &Config, sink: &dyn Sink) -> Result<HarvestStatistics, HarvestError> {
    let pipeline = Pipeline::new(config)?;
    let mut stats = HarvestStatistics::start();

    let outcome = pipeline.discover(&mut stats).await;
    if outcome.product_urls.is_empty() {
        tracing::warn!("No product URLs found from {}", config.crawler.start_url);
    }

    let session = WebDriverSession::connect(&config.render, &config.user_agent.identity)
        .await
        .map_err(|e| {
            tracing::error!("Failed to start browser session: {}", e);
            e
        })?;

    pipeline.harvest(outcome, session, sink, stats).await
}

/// Runs discovery only and writes the product URL list
pub async fn discover_only(
    config: &Config,
    sink: &dyn Sink,
) -> Result<HarvestStatistics, HarvestError> {
    let pipeline = Pipeline::new(config)?;
    let mut stats = HarvestStatistics::start();

    let outcome = pipeline.discover(&mut stats).await;
    sink.write_product_urls(&outcome.product_urls)?;
    stats.finish();

    Ok(stats)
}

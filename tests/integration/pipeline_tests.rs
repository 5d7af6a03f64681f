//! Integration tests for the full harvest pipeline
//!
//! HTTP pages come from wiremock; the browser is replaced by `FakeBrowser`,
//! which serves prepared review pages and advances one page per click.

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use storefront_harvest::config::Config;
use storefront_harvest::model::PRICE_NOT_FOUND;
use storefront_harvest::output::{load_product_urls, load_records, JsonSink};
use storefront_harvest::pipeline::{discover_only, run, Pipeline};
use storefront_harvest::render::{RenderResult, RenderSession};
use storefront_harvest::HarvestError;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct FakeBrowser {
    pages: HashMap<String, Vec<String>>,
    position: Mutex<(String, usize)>,
    quits: Arc<AtomicUsize>,
}

impl FakeBrowser {
    fn with_reviews(mut self, url: String, pages: Vec<String>) -> Self {
        self.pages.insert(url, pages);
        self
    }

    fn current(&self) -> String {
        let position = self.position.lock().unwrap();
        self.pages
            .get(&position.0)
            .and_then(|pages| pages.get(position.1))
            .cloned()
            .unwrap_or_else(|| "<html><body></body></html>".to_string())
    }
}

#[async_trait]
impl RenderSession for FakeBrowser {
    async fn load(&self, url: &str) -> RenderResult<()> {
        *self.position.lock().unwrap() = (url.to_string(), 0);
        Ok(())
    }

    async fn snapshot(&self) -> RenderResult<String> {
        Ok(self.current())
    }

    async fn click(&self, selector: &str) -> RenderResult<bool> {
        let found = {
            let document = Html::parse_document(&self.current());
            Selector::parse(selector)
                .map(|s| document.select(&s).next().is_some())
                .unwrap_or(false)
        };
        if found {
            self.position.lock().unwrap().1 += 1;
        }
        Ok(found)
    }

    async fn quit(&self) -> RenderResult<()> {
        self.quits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn review_page(current: u32, total: u32, reviews: &[(&str, &str)]) -> String {
    let items: String = reviews
        .iter()
        .map(|(author, body)| {
            format!(
                r#"<div class="jdgm-rev">
                     <span class="jdgm-rev__rating" data-score="4"></span>
                     <span class="jdgm-rev__author">{}</span>
                     <div class="jdgm-rev__body"><p>{}</p></div>
                   </div>"#,
                author, body
            )
        })
        .collect();
    let controls: String = (1..=total)
        .filter(|n| *n != current && total > 1)
        .map(|n| format!(r#"<a class="jdgm-paginate__page" data-page="{n}">{n}</a>"#))
        .collect();
    format!("<html><body>{}{}</body></html>", items, controls)
}

async fn mount_page(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn product_page(name: &str, price: Option<&str>) -> String {
    let price = price
        .map(|p| {
            format!(
                r#"<span class="price-item price-item--sale price-item--last">{}</span>"#,
                p
            )
        })
        .unwrap_or_default();
    format!(
        r#"<html><body><div class="product__title"><h1>{}</h1></div>{}</body></html>"#,
        name, price
    )
}

async fn storefront(server: &MockServer) {
    mount_page(
        server,
        "/",
        r#"<a href="/products/soap">Soap</a><a href="/collections/all">All</a>"#.to_string(),
    )
    .await;
    mount_page(
        server,
        "/collections/all",
        r#"<a href="/products/candle">Candle</a><a href="/products/soap">Soap</a>"#.to_string(),
    )
    .await;
    mount_page(server, "/products/soap", product_page("Goat Milk Soap", Some("$8.00"))).await;
    mount_page(server, "/products/candle", product_page("Beeswax Candle", None)).await;
}

fn test_config(start_url: String) -> Config {
    let mut config = Config::with_start_url(start_url);
    config.render.wait_timeout = 100;
    config.render.settle_timeout = 500;
    config.render.settle_initial_backoff = 1;
    config.render.settle_max_backoff = 20;
    config
}

#[tokio::test]
async fn test_full_harvest_writes_records() {
    let server = MockServer::start().await;
    storefront(&server).await;

    let soap = format!("{}/products/soap", server.uri());
    let browser = FakeBrowser::default().with_reviews(
        soap.clone(),
        vec![
            review_page(1, 3, &[("R1", "one"), ("R2", "two")]),
            review_page(2, 3, &[("R3", "three"), ("R4", "four")]),
            review_page(3, 3, &[("R5", "five"), ("R6", "six")]),
        ],
    );
    let quits = Arc::clone(&browser.quits);

    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("product_data.json");
    let sink = JsonSink::new(&out);

    let config = test_config(server.uri());
    let pipeline = Pipeline::new(&config).unwrap();
    let stats = pipeline.run_with_session(browser, &sink).await.unwrap();

    assert_eq!(quits.load(Ordering::SeqCst), 1);
    assert_eq!(stats.product_urls_found, 2);
    assert_eq!(stats.products_processed, 2);
    assert_eq!(stats.products_with_reviews, 1);
    assert_eq!(stats.reviews_collected, 6);
    assert_eq!(stats.prices_missing, 1);

    let records = load_records(&out).unwrap();
    assert_eq!(records.len(), 2);

    // BTreeSet order: candle before soap
    let candle = &records[0];
    assert!(candle.url.ends_with("/products/candle"));
    assert_eq!(candle.name, "Beeswax Candle");
    assert_eq!(candle.price, PRICE_NOT_FOUND);
    assert_eq!(candle.review_count, 0);

    let soap_record = &records[1];
    assert_eq!(soap_record.url, soap);
    assert_eq!(soap_record.name, "Goat Milk Soap");
    assert_eq!(soap_record.price, "$8.00");
    let authors: Vec<_> = soap_record.reviews.iter().map(|r| r.author.as_str()).collect();
    assert_eq!(authors, vec!["R1", "R2", "R3", "R4", "R5", "R6"]);
    assert_eq!(soap_record.review_count, 6);
    assert_eq!(soap_record.reviews[0].rating, "4");
    assert_eq!(soap_record.reviews[0].timestamp, "Not found");
}

#[tokio::test]
async fn test_sink_failure_still_quits_browser() {
    let server = MockServer::start().await;
    storefront(&server).await;

    let browser = FakeBrowser::default();
    let quits = Arc::clone(&browser.quits);

    // A directory cannot be opened as a file
    let temp_dir = TempDir::new().unwrap();
    let sink = JsonSink::new(temp_dir.path());

    let config = test_config(server.uri());
    let pipeline = Pipeline::new(&config).unwrap();
    let result = pipeline.run_with_session(browser, &sink).await;

    assert!(matches!(result, Err(HarvestError::Output(_))));
    assert_eq!(quits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_discover_only_writes_url_list() {
    let server = MockServer::start().await;
    storefront(&server).await;

    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("urls").join("product_urls.json");
    let sink = JsonSink::new(&out);

    let config = test_config(server.uri());
    let stats = discover_only(&config, &sink).await.unwrap();

    let urls = load_product_urls(&out).unwrap();
    assert_eq!(urls.len(), 2);
    assert_eq!(stats.product_urls_found, 2);
    assert_eq!(stats.pages_visited, 2);
    assert!(urls.iter().all(|u| u.starts_with(&server.uri())));
}

#[tokio::test]
async fn test_nothing_to_harvest() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<html><body>Closed for winter</body></html>".to_string()).await;

    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("product_data.json");
    let sink = JsonSink::new(&out);

    let browser = FakeBrowser::default();
    let quits = Arc::clone(&browser.quits);

    let config = test_config(server.uri());
    let pipeline = Pipeline::new(&config).unwrap();
    let stats = pipeline.run_with_session(browser, &sink).await.unwrap();

    assert_eq!(stats.products_processed, 0);
    assert!(load_records(&out).unwrap().is_empty());
    assert_eq!(quits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_browser_start_failure_writes_nothing() {
    let server = MockServer::start().await;
    storefront(&server).await;

    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("product_data.json");
    let sink = JsonSink::new(&out);

    // Nothing listens on the discard port
    let mut config = test_config(server.uri());
    config.render.webdriver_url = "http://127.0.0.1:9".to_string();

    let result = run(&config, &sink).await;

    assert!(matches!(result, Err(HarvestError::Render(_))));
    assert!(!out.exists());
}

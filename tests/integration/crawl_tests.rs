//! Integration tests for the frontier crawler

use std::collections::BTreeSet;
use storefront_harvest::config::Config;
use storefront_harvest::crawler::discover_products;
use storefront_harvest::site::{MARKETPLACE, STOREFRONT};
use storefront_harvest::url::extract_host;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page at `at`
async fn mount_page(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn links(hrefs: &[&str]) -> String {
    let anchors: Vec<String> = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!("<html><body>{}</body></html>", anchors.join("\n"))
}

fn create_test_config(start_url: String) -> Config {
    let mut config = Config::with_start_url(start_url);
    config.crawler.request_timeout = 2000;
    config
}

#[tokio::test]
async fn test_discovers_products_across_pages() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        links(&["/collections/all", "/pages/about", "/products/goat-milk-soap"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/collections/all",
        links(&[
            "/products/goat-milk-soap",
            "/products/lavender-candle",
            "/collections/all?page=2",
        ]),
    )
    .await;
    mount_page(&mock_server, "/pages/about", links(&["/"])).await;

    let config = create_test_config(mock_server.uri());
    let outcome = discover_products(&config, &STOREFRONT).await.unwrap();

    let expected: BTreeSet<String> = [
        format!("{}/products/goat-milk-soap", mock_server.uri()),
        format!("{}/products/lavender-candle", mock_server.uri()),
    ]
    .into_iter()
    .collect();

    assert_eq!(outcome.product_urls, expected);
    // "/", "/collections/all", "/pages/about", "/collections/all?page=2"
    assert_eq!(outcome.pages_visited, 4);
}

#[tokio::test]
async fn test_products_are_same_host_and_marked() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;

    let foreign_product = format!("{}/products/foreign", other_server.uri());
    mount_page(
        &mock_server,
        "/",
        links(&[
            "/products/local",
            &foreign_product,
            "https://cdn.example.net/products/image.png",
            "/blogs/news",
        ]),
    )
    .await;
    mount_page(&mock_server, "/blogs/news", links(&["/products/from-blog"])).await;

    // The other host must never be contacted
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&other_server)
        .await;

    let config = create_test_config(mock_server.uri());
    let outcome = discover_products(&config, &STOREFRONT).await.unwrap();

    let seed = Url::parse(&mock_server.uri()).unwrap();
    assert_eq!(outcome.product_urls.len(), 2);
    for product in &outcome.product_urls {
        let url = Url::parse(product).unwrap();
        assert_eq!(extract_host(&url), extract_host(&seed));
        assert!(url.path().contains("/products/"));
    }
}

#[tokio::test]
async fn test_page_budget_bounds_visits() {
    let mock_server = MockServer::start().await;

    // Every page links to ten fresh pages; the graph is far larger than the budget
    for i in 0..40 {
        let children: Vec<String> = (0..10).map(|j| format!("/c/{}", i * 10 + j + 1)).collect();
        let refs: Vec<&str> = children.iter().map(String::as_str).collect();
        let at = if i == 0 { "/".to_string() } else { format!("/c/{}", i) };
        mount_page(&mock_server, &at, links(&refs)).await;
    }

    let mut config = create_test_config(mock_server.uri());
    config.crawler.max_pages = 7;
    let outcome = discover_products(&config, &STOREFRONT).await.unwrap();

    assert_eq!(outcome.pages_visited, 7);
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 7);
}

#[tokio::test]
async fn test_failed_pages_count_and_crawl_continues() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        links(&["/broken", "/missing", "/collections/all"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/collections/all",
        links(&["/products/survivor"]),
    )
    .await;

    let config = create_test_config(mock_server.uri());
    let outcome = discover_products(&config, &STOREFRONT).await.unwrap();

    assert_eq!(outcome.pages_visited, 4);
    assert_eq!(outcome.product_urls.len(), 1);
}

#[tokio::test]
async fn test_trailing_slash_pages_fetched_as_linked() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", links(&["/pages/info/"])).await;
    mount_page(&mock_server, "/pages/info/", links(&["details"])).await;
    mount_page(&mock_server, "/pages/info/details", links(&["/products/deep"])).await;

    let config = create_test_config(mock_server.uri());
    let outcome = discover_products(&config, &STOREFRONT).await.unwrap();

    let requested: Vec<String> = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect();
    assert_eq!(requested, vec!["/", "/pages/info/", "/pages/info/details"]);

    let expected = format!("{}/products/deep", mock_server.uri());
    assert_eq!(outcome.product_urls.len(), 1);
    assert!(outcome.product_urls.contains(&expected));
}

#[tokio::test]
async fn test_unreachable_seed_yields_nothing() {
    let config = create_test_config("http://127.0.0.1:9/".to_string());
    let outcome = discover_products(&config, &STOREFRONT).await.unwrap();

    assert_eq!(outcome.pages_visited, 1);
    assert!(outcome.product_urls.is_empty());
}

#[tokio::test]
async fn test_depth_bound() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", links(&["/d1", "/products/p0"])).await;
    mount_page(&mock_server, "/d1", links(&["/d2", "/products/p1"])).await;
    mount_page(&mock_server, "/d2", links(&["/d3", "/products/p2"])).await;
    mount_page(&mock_server, "/d3", links(&["/products/p3"])).await;

    let mut config = create_test_config(mock_server.uri());
    config.crawler.max_depth = Some(1);
    let outcome = discover_products(&config, &STOREFRONT).await.unwrap();
    assert_eq!(outcome.pages_visited, 2);
    assert_eq!(outcome.product_urls.len(), 2);

    config.crawler.max_depth = None;
    let outcome = discover_products(&config, &STOREFRONT).await.unwrap();
    assert_eq!(outcome.pages_visited, 4);
    assert_eq!(outcome.product_urls.len(), 4);
}

#[tokio::test]
async fn test_empty_page_yields_nothing() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "<html><body></body></html>".to_string()).await;

    let config = create_test_config(mock_server.uri());
    let outcome = discover_products(&config, &STOREFRONT).await.unwrap();

    assert_eq!(outcome.pages_visited, 1);
    assert!(outcome.product_urls.is_empty());
}

#[tokio::test]
async fn test_marketplace_search_results() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/s",
        r#"<html><body>
            <div data-component-type="s-search-result">
              <a class="a-link-normal s-no-outline" href="/Steel-Bottle/dp/B0AAA00001?qid=1&sr=8-1">img</a>
            </div>
            <div data-component-type="s-search-result">
              <a class="a-link-normal s-no-outline" href="/Flask/dp/B0AAA00002?qid=1&sr=8-2">img</a>
            </div>
            <a href="/dp/B0SPONSORED">Sponsored outside the results</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    let mut config = create_test_config(format!("{}/s", mock_server.uri()));
    config.crawler.site = storefront_harvest::site::SiteKind::Marketplace;
    let outcome = discover_products(&config, &MARKETPLACE).await.unwrap();

    let expected: BTreeSet<String> = [
        format!("{}/Steel-Bottle/dp/B0AAA00001", mock_server.uri()),
        format!("{}/Flask/dp/B0AAA00002", mock_server.uri()),
    ]
    .into_iter()
    .collect();
    assert_eq!(outcome.product_urls, expected);
}

use crate::site::SiteKind;
use serde::Deserialize;

/// Main configuration structure for Storefront-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seed URL; its host bounds the crawl
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Which built-in site structure to use
    #[serde(default)]
    pub site: SiteKind,

    /// Maximum number of distinct pages visited
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum link depth from the seed; unlimited when absent
    #[serde(rename = "max-depth", default)]
    pub max_depth: Option<u32>,

    /// Per-request timeout (milliseconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Fixed pause between crawl requests (milliseconds)
    #[serde(rename = "request-delay", default)]
    pub request_delay: u64,

    /// Overrides the site profile's product-path marker
    #[serde(rename = "product-path-marker", default)]
    pub product_path_marker: Option<String>,
}

/// Client identity sent with every HTTP request
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Full User-Agent header value
    #[serde(default = "default_identity")]
    pub identity: String,

    /// Accept-Language header value
    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// WebDriver endpoint (chromedriver)
    #[serde(rename = "webdriver-url", default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// How long to wait for reviews to appear on first load (milliseconds)
    #[serde(rename = "wait-timeout", default = "default_wait_timeout")]
    pub wait_timeout: u64,

    /// Upper bound on the post-click settle wait (milliseconds)
    #[serde(rename = "settle-timeout", default = "default_settle_timeout")]
    pub settle_timeout: u64,

    /// First poll interval of the settle wait (milliseconds)
    #[serde(
        rename = "settle-initial-backoff",
        default = "default_settle_initial_backoff"
    )]
    pub settle_initial_backoff: u64,

    /// Poll interval ceiling of the settle wait (milliseconds)
    #[serde(rename = "settle-max-backoff", default = "default_settle_max_backoff")]
    pub settle_max_backoff: u64,

    /// Maximum review pages visited per product; unlimited when absent
    #[serde(rename = "max-review-pages", default)]
    pub max_review_pages: Option<u32>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON file receiving the results
    #[serde(default = "default_output_path")]
    pub path: String,
}

fn default_max_pages() -> usize {
    100
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_identity() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_wait_timeout() -> u64 {
    10_000
}

fn default_settle_timeout() -> u64 {
    10_000
}

fn default_settle_initial_backoff() -> u64 {
    100
}

fn default_settle_max_backoff() -> u64 {
    1_600
}

fn default_output_path() -> String {
    "product_data.json".to_string()
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            identity: default_identity(),
            accept_language: default_accept_language(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            wait_timeout: default_wait_timeout(),
            settle_timeout: default_settle_timeout(),
            settle_initial_backoff: default_settle_initial_backoff(),
            settle_max_backoff: default_settle_max_backoff(),
            max_review_pages: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl CrawlerConfig {
    /// Creates a crawler configuration with defaults for everything but the seed
    pub fn with_start_url(start_url: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            site: SiteKind::default(),
            max_pages: default_max_pages(),
            max_depth: None,
            request_timeout: default_request_timeout(),
            request_delay: 0,
            product_path_marker: None,
        }
    }
}

impl Config {
    /// Creates a configuration with defaults for everything but the seed
    pub fn with_start_url(start_url: impl Into<String>) -> Self {
        Self {
            crawler: CrawlerConfig::with_start_url(start_url),
            user_agent: UserAgentConfig::default(),
            render: RenderConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

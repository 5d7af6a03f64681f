//! HTTP fetcher implementation
//!
//! This module handles all plain HTTP requests, including:
//! - Building HTTP clients with a browser-like identity
//! - GET requests to fetch page content
//! - Error classification
//!
//! A failed fetch is never an error to the caller: it is a [`FetchResult`]
//! variant the caller logs and moves past.

use crate::config::UserAgentConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, DNS, broken body)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Body of a successful fetch
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Success { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Servers commonly answer default library identities with different markup
/// or a block page, so the configured browser identity and language are sent
/// with every request.
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use storefront_harvest::config::UserAgentConfig;
/// use storefront_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
    );
    if let Ok(language) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, language);
    }

    Client::builder()
        .user_agent(config.identity.as_str())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with readable body | `Success` |
/// | Any other status | `HttpError` |
/// | Timeout | `NetworkError("Request timeout")` |
/// | Connection refused / DNS | `NetworkError("Connection failed")` |
/// | Anything else | `NetworkError(description)` |
///
/// No retries are made.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => classify_error(&e),
    }
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection failed".to_string()
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}

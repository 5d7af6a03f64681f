//! Link extraction for the frontier crawler
//!
//! Every anchor matched by the site's link selector is resolved against the
//! page it was found on, normalized, and sorted into product links and
//! traversable links. Links to other hosts are dropped here.

use crate::url::{classify_link, normalize_url, LinkKind};
use scraper::{Html, Selector};
use url::Url;

/// Same-host links found on one page, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredLinks {
    /// Links whose path contains the product marker, normalized
    pub products: Vec<Url>,

    /// Every other same-host link, as resolved against the page
    pub traversable: Vec<Url>,
}

impl DiscoveredLinks {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.traversable.is_empty()
    }
}

/// What the link extractor needs to know about the crawl
#[derive(Debug, Clone, Copy)]
pub struct LinkRules<'a> {
    /// Seed URL; its host is the only host followed
    pub seed: &'a Url,
    /// Anchors scanned on every page
    pub link_selector: &'a str,
    /// Path substring that marks a product page
    pub product_marker: &'a str,
}

/// Extracts and classifies the links of one page
///
/// # Link Extraction Rules
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
/// - Links that fail to normalize
/// - Links to any host other than the seed's
///
/// # Example
///
/// ```
/// use storefront_harvest::crawler::{extract_links, LinkRules};
/// use url::Url;
///
/// let seed = Url::parse("https://shop.example.com/").unwrap();
/// let rules = LinkRules { seed: &seed, link_selector: "a[href]", product_marker: "/products/" };
/// let html = r#"<a href="/products/soap">Soap</a><a href="/pages/about">About</a>"#;
/// let links = extract_links(html, &seed, &rules);
/// assert_eq!(links.products.len(), 1);
/// assert_eq!(links.traversable.len(), 1);
/// ```
pub fn extract_links(html: &str, page_url: &Url, rules: &LinkRules<'_>) -> DiscoveredLinks {
    let mut links = DiscoveredLinks::default();

    let Ok(selector) = Selector::parse(rules.link_selector) else {
        tracing::warn!("Unparseable link selector {:?}", rules.link_selector);
        return links;
    };

    let document = Html::parse_document(html);

    for element in document.select(&selector) {
        // Skip if it has the download attribute
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(mut absolute) = resolve_link(href, page_url) else {
            continue;
        };

        let normalized = match normalize_url(absolute.as_str()) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping link {}: {}", absolute, e);
                continue;
            }
        };

        match classify_link(&normalized, rules.seed, rules.product_marker) {
            LinkKind::Product => links.products.push(normalized),
            LinkKind::Traversable => {
                absolute.set_fragment(None);
                links.traversable.push(absolute);
            }
            LinkKind::External => {}
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    // Same page anchors
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

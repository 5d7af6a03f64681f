//! URL handling module for Storefront-Harvest
//!
//! This module provides URL normalization, host comparison, and the
//! product/traversable classification of discovered links.

mod domain;
mod normalize;

pub use domain::{extract_host, same_host};
pub use normalize::normalize_url;

use url::Url;

/// What a discovered link is to the crawler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Same-host product detail page
    Product,
    /// Same-host page worth visiting for more links
    Traversable,
    /// Different host; dropped without comment
    External,
}

/// Classifies a link relative to the crawl's seed URL
///
/// A link is a product when it is on the seed's host and its path contains
/// `product_marker`; any other same-host link is traversable.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use storefront_harvest::url::{classify_link, LinkKind};
///
/// let seed = Url::parse("https://shop.example.com/").unwrap();
/// let link = Url::parse("https://shop.example.com/products/soap").unwrap();
/// assert_eq!(classify_link(&link, &seed, "/products/"), LinkKind::Product);
/// ```
pub fn classify_link(link: &Url, seed: &Url, product_marker: &str) -> LinkKind {
    if !same_host(link, seed) {
        return LinkKind::External;
    }

    if link.path().contains(product_marker) {
        LinkKind::Product
    } else {
        LinkKind::Traversable
    }
}

//! Crawler module for product discovery
//!
//! This module contains the HTTP side of a harvest:
//! - HTTP fetching with a browser-like identity
//! - Link extraction and product/traversable classification
//! - The breadth-first frontier with its page budget
//! - The discovery loop tying them together

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{discover_products, CrawlOutcome, FrontierCrawler};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use frontier::{CrawlTask, Frontier};
pub use parser::{extract_links, DiscoveredLinks, LinkRules};

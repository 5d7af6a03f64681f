//! Structured data extraction from product pages
//!
//! - `field`: one selector, one value, `NotFound` when absent
//! - `product`: name and price
//! - `reviews`: review elements on the current page
//! - `paginator`: walking every review page through a render session

mod field;
mod paginator;
mod product;
mod reviews;

pub use field::{element_text, source_matches, FieldSelector, FieldSource, NotFound};
pub use paginator::{max_page_index, EndReason, ExtractionState, PaginatedExtractor, ReviewExtraction};
pub use product::scrape_product_fields;
pub use reviews::{extract_reviews, review_fingerprint, ReviewSelectors};

//! Records produced by a harvest run
//!
//! Extraction code hands over `Result<String, NotFound>` per field; the
//! constructors here are the single place where a missing field turns into its
//! sentinel string.

use crate::extract::NotFound;
use serde::{Deserialize, Serialize};

/// Sentinel for a product name that could not be extracted
pub const NAME_NOT_FOUND: &str = "Product name not found";

/// Sentinel for a price that could not be extracted
pub const PRICE_NOT_FOUND: &str = "Price not found";

/// Sentinel for a review author that could not be extracted
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Sentinel for a review timestamp that could not be extracted
pub const TIMESTAMP_NOT_FOUND: &str = "Not found";

/// Sentinel for a review body that could not be extracted
pub const BODY_NOT_FOUND: &str = "No review text";

/// A single customer review
///
/// Fields are extracted independently; a review made entirely of sentinels is
/// still a valid review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    #[serde(rename = "stars")]
    pub rating: String,
    pub timestamp: String,
    pub body: String,
}

/// Raw per-field extraction results for one review element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewFields {
    pub author: Result<String, NotFound>,
    pub rating: Result<String, NotFound>,
    pub timestamp: Result<String, NotFound>,
    pub body: Result<String, NotFound>,
}

impl Review {
    /// Builds a review, substituting sentinels for missing fields
    ///
    /// The rating sentinel differs between site structures, so the caller
    /// passes it in.
    pub fn from_fields(fields: ReviewFields, missing_rating: &str) -> Self {
        Self {
            author: fields.author.unwrap_or_else(|_| UNKNOWN_AUTHOR.to_string()),
            rating: fields.rating.unwrap_or_else(|_| missing_rating.to_string()),
            timestamp: fields
                .timestamp
                .unwrap_or_else(|_| TIMESTAMP_NOT_FOUND.to_string()),
            body: fields.body.unwrap_or_else(|_| BODY_NOT_FOUND.to_string()),
        }
    }
}

/// Scalar fields scraped from a product page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: Result<String, NotFound>,
    pub price: Result<String, NotFound>,
}

impl ProductFields {
    /// Fields for a page that could not be fetched at all
    pub fn missing() -> Self {
        Self {
            name: Err(NotFound),
            price: Err(NotFound),
        }
    }
}

/// Everything collected for one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub url: String,
    #[serde(rename = "product_name")]
    pub name: String,
    pub price: String,
    #[serde(rename = "total_reviews")]
    pub review_count: usize,
    pub reviews: Vec<Review>,
}

impl ProductRecord {
    /// Combines scraped fields and reviews; `review_count` is the review total
    pub fn new(url: impl Into<String>, fields: ProductFields, reviews: Vec<Review>) -> Self {
        Self {
            url: url.into(),
            name: fields.name.unwrap_or_else(|_| NAME_NOT_FOUND.to_string()),
            price: fields.price.unwrap_or_else(|_| PRICE_NOT_FOUND.to_string()),
            review_count: reviews.len(),
            reviews,
        }
    }

    /// True when the name could not be extracted
    pub fn name_missing(&self) -> bool {
        self.name == NAME_NOT_FOUND
    }

    /// True when the price could not be extracted
    pub fn price_missing(&self) -> bool {
        self.price == PRICE_NOT_FOUND
    }
}

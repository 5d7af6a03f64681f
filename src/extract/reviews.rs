//! Review extraction from a rendered page snapshot

use crate::extract::field::{element_text, FieldSelector};
use crate::model::{Review, ReviewFields};
use scraper::{Html, Selector};

/// Selectors describing one review element and its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSelectors {
    /// One match per review on the page
    pub item: &'static str,
    pub author: FieldSelector,
    pub rating: FieldSelector,
    pub timestamp: FieldSelector,
    pub body: FieldSelector,
    /// Sentinel used when the rating is absent
    pub missing_rating: &'static str,
}

/// Reads every review currently present in the page source, in document order
pub fn extract_reviews(source: &str, selectors: &ReviewSelectors) -> Vec<Review> {
    let Ok(item_selector) = Selector::parse(selectors.item) else {
        tracing::warn!("Unparseable review selector {:?}", selectors.item);
        return Vec::new();
    };

    let document = Html::parse_document(source);

    document
        .select(&item_selector)
        .map(|element| {
            let fields = ReviewFields {
                author: selectors.author.extract_within(element),
                rating: selectors.rating.extract_within(element),
                timestamp: selectors.timestamp.extract_within(element),
                body: selectors.body.extract_within(element),
            };
            Review::from_fields(fields, selectors.missing_rating)
        })
        .collect()
}

/// Summarizes the review region so a content swap can be detected
///
/// Returns an empty string when no review elements are present.
pub fn review_fingerprint(source: &str, selectors: &ReviewSelectors) -> String {
    let Ok(item_selector) = Selector::parse(selectors.item) else {
        return String::new();
    };

    let document = Html::parse_document(source);

    document
        .select(&item_selector)
        .map(element_text)
        .collect::<Vec<_>>()
        .join("\u{1f}")
}

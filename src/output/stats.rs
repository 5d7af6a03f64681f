//! Run statistics
//!
//! Counters accumulated by the pipeline while it works, printed once at the
//! end of a run.

use crate::model::ProductRecord;
use chrono::{DateTime, Utc};

/// Harvest run statistics summary
#[derive(Debug, Clone)]
pub struct HarvestStatistics {
    /// Pages dequeued by the frontier crawler
    pub pages_visited: usize,

    /// Distinct product URLs discovered
    pub product_urls_found: usize,

    /// Products for which a record was produced
    pub products_processed: usize,

    /// Products with at least one review
    pub products_with_reviews: usize,

    /// Reviews across all products
    pub reviews_collected: usize,

    /// Records whose name is the sentinel
    pub names_missing: usize,

    /// Records whose price is the sentinel
    pub prices_missing: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl HarvestStatistics {
    /// Starts a new set of counters stamped with the current time
    pub fn start() -> Self {
        Self {
            pages_visited: 0,
            product_urls_found: 0,
            products_processed: 0,
            products_with_reviews: 0,
            reviews_collected: 0,
            names_missing: 0,
            prices_missing: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Counts one finished product record
    pub fn record_product(&mut self, record: &ProductRecord) {
        self.products_processed += 1;
        self.reviews_collected += record.review_count;
        if record.review_count > 0 {
            self.products_with_reviews += 1;
        }
        if record.name_missing() {
            self.names_missing += 1;
        }
        if record.price_missing() {
            self.prices_missing += 1;
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Seconds between start and finish (or now, if still running)
    pub fn elapsed_seconds(&self) -> i64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_seconds()
    }

    /// Mean reviews per processed product
    pub fn average_reviews(&self) -> f64 {
        if self.products_processed == 0 {
            return 0.0;
        }
        self.reviews_collected as f64 / self.products_processed as f64
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Discovery:");
    println!("  Pages crawled: {}", stats.pages_visited);
    println!("  Product URLs found: {}", stats.product_urls_found);
    println!();

    println!("Extraction:");
    println!("  Products processed: {}", stats.products_processed);
    println!(
        "  Products with reviews: {}",
        stats.products_with_reviews
    );
    println!(
        "  Reviews collected: {} ({:.1} per product)",
        stats.reviews_collected,
        stats.average_reviews()
    );
    println!();

    if stats.names_missing > 0 || stats.prices_missing > 0 {
        println!("Missing Fields:");
        println!("  Product name not found: {}", stats.names_missing);
        println!("  Price not found: {}", stats.prices_missing);
        println!();
    }

    println!("Timing:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    println!("  Elapsed: {}s", stats.elapsed_seconds());
    println!();
}

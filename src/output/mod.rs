//! Output module for persisting harvest results
//!
//! This module handles:
//! - The sink contract records are written through
//! - The JSON file sink and its readers
//! - Run statistics and the closing summary

mod json;
pub mod stats;
mod traits;

pub use json::{load_product_urls, load_records, JsonSink};
pub use stats::{print_statistics, HarvestStatistics};
pub use traits::{OutputError, OutputResult, Sink};

//! Sink trait and output errors

use crate::model::ProductRecord;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for the results of a harvest
///
/// A sink is called once, after all products are processed; nothing is
/// written for a run that fails before reaching it.
pub trait Sink {
    /// Persists the product records in the order given
    fn write_records(&self, records: &[ProductRecord]) -> OutputResult<()>;

    /// Persists the discovered product URLs
    fn write_product_urls(&self, urls: &BTreeSet<String>) -> OutputResult<()>;

    /// Where this sink writes, for the closing summary line
    fn describe(&self) -> String;
}

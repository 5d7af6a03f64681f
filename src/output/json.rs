//! JSON file sink

use crate::model::ProductRecord;
use crate::output::traits::{OutputError, OutputResult, Sink};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes results as 4-space indented UTF-8 JSON
///
/// Non-ASCII text is written as-is rather than `\u` escaped.
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn write_value<T: Serialize + ?Sized>(&self, value: &T) -> OutputResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        value.serialize(&mut serializer)?;

        let mut file = fs::File::create(&self.path)?;
        file.write_all(&buffer)?;
        file.flush()?;

        tracing::debug!("Wrote {} bytes to {}", buffer.len(), self.path.display());
        Ok(())
    }
}

impl Sink for JsonSink {
    fn write_records(&self, records: &[ProductRecord]) -> OutputResult<()> {
        self.write_value(records)
    }

    fn write_product_urls(&self, urls: &BTreeSet<String>) -> OutputResult<()> {
        self.write_value(urls)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn read_value<T: DeserializeOwned>(path: &Path) -> OutputResult<T> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(OutputError::from)
}

/// Reads product records written by [`JsonSink::write_records`]
pub fn load_records(path: impl AsRef<Path>) -> OutputResult<Vec<ProductRecord>> {
    read_value(path.as_ref())
}

/// Reads a product URL list written by [`JsonSink::write_product_urls`]
pub fn load_product_urls(path: impl AsRef<Path>) -> OutputResult<BTreeSet<String>> {
    read_value(path.as_ref())
}

//! Single-field extraction
//!
//! A field is located by CSS selector inside some scope (a whole document or a
//! single review element) and read either from its text or from an attribute.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// The element (or attribute) backing a field is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("element not found")]
pub struct NotFound;

/// Where a field's value is read from once its element is found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Whitespace-collapsed text content
    Text,
    /// Value of the named attribute
    Attr(&'static str),
}

/// Locates one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelector {
    pub css: &'static str,
    pub source: FieldSource,
}

impl FieldSelector {
    pub const fn text(css: &'static str) -> Self {
        Self {
            css,
            source: FieldSource::Text,
        }
    }

    pub const fn attr(css: &'static str, attr: &'static str) -> Self {
        Self {
            css,
            source: FieldSource::Attr(attr),
        }
    }

    /// Extracts the field from the first match anywhere in the document
    pub fn extract_from_document(&self, document: &Html) -> Result<String, NotFound> {
        let selector = self.selector()?;
        let element = document.select(&selector).next().ok_or(NotFound)?;
        self.read(element)
    }

    /// Extracts the field from the first match below `scope`
    pub fn extract_within(&self, scope: ElementRef<'_>) -> Result<String, NotFound> {
        let selector = self.selector()?;
        let element = scope.select(&selector).next().ok_or(NotFound)?;
        self.read(element)
    }

    fn selector(&self) -> Result<Selector, NotFound> {
        Selector::parse(self.css).map_err(|e| {
            tracing::debug!("Unparseable selector {:?}: {}", self.css, e);
            NotFound
        })
    }

    fn read(&self, element: ElementRef<'_>) -> Result<String, NotFound> {
        match self.source {
            FieldSource::Text => Ok(element_text(element)),
            FieldSource::Attr(name) => element
                .value()
                .attr(name)
                .map(|v| v.trim().to_string())
                .ok_or(NotFound),
        }
    }
}

/// Text content of an element with runs of whitespace collapsed
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when at least one element in the page source matches `css`
pub fn source_matches(source: &str, css: &str) -> bool {
    match Selector::parse(css) {
        Ok(selector) => Html::parse_document(source).select(&selector).next().is_some(),
        Err(_) => false,
    }
}

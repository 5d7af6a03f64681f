//! Product field scraping
//!
//! Name and price are looked up independently; either may be missing without
//! affecting the other.

use crate::model::ProductFields;
use crate::site::ProductSelectors;
use scraper::Html;

/// Scrapes name and price from a product page's HTML
///
/// # Example
///
/// ```
/// use storefront_harvest::extract::scrape_product_fields;
/// use storefront_harvest::site::STOREFRONT;
///
/// let html = r#"<div class="product__title">Soap</div>"#;
/// let fields = scrape_product_fields(html, &STOREFRONT.product);
/// assert_eq!(fields.name, Ok("Soap".to_string()));
/// assert!(fields.price.is_err());
/// ```
pub fn scrape_product_fields(html: &str, selectors: &ProductSelectors) -> ProductFields {
    let document = Html::parse_document(html);

    ProductFields {
        name: selectors.name.extract_from_document(&document),
        price: selectors.price.extract_from_document(&document),
    }
}

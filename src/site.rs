//! Built-in site profiles
//!
//! Each supported storefront structure is described by a fixed set of selectors:
//! where product links live, how product name and price are marked up, what a
//! review looks like, and how the review widget paginates.

use crate::extract::{FieldSelector, ReviewSelectors};
use serde::Deserialize;
use std::fmt;

/// The supported site structures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteKind {
    /// Shopify-style storefront with a Judge.me review widget
    #[default]
    Storefront,
    /// Amazon-style marketplace search results and review lists
    Marketplace,
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storefront => write!(f, "storefront"),
            Self::Marketplace => write!(f, "marketplace"),
        }
    }
}

/// How the review widget moves between pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// Numbered page controls; total page count read once from an attribute
    Numbered {
        /// Every page control
        page_selector: &'static str,
        /// Attribute carrying the page index
        page_attr: &'static str,
        /// Control for a given page; `{n}` is replaced by the page index
        control_template: &'static str,
    },

    /// A single "next" control, disabled on the last page
    NextButton {
        /// The clickable next control
        next_selector: &'static str,
        /// Present only when there is no next page
        disabled_selector: &'static str,
    },
}

impl Pagination {
    /// Selector for the control leading to page `n` (numbered pagination only)
    pub fn control_for_page(&self, n: u32) -> Option<String> {
        match self {
            Self::Numbered {
                control_template, ..
            } => Some(control_template.replace("{n}", &n.to_string())),
            Self::NextButton { .. } => None,
        }
    }
}

/// Selectors for the scalar product fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSelectors {
    pub name: FieldSelector,
    pub price: FieldSelector,
}

/// Everything needed to crawl and extract one site structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteProfile {
    pub kind: SiteKind,

    /// URL substring identifying product detail pages
    pub product_path_marker: &'static str,

    /// Anchors scanned for links on every crawled page
    pub link_selector: &'static str,

    pub product: ProductSelectors,

    pub reviews: ReviewSelectors,

    /// Element whose presence means reviews have rendered
    pub presence_selector: &'static str,

    pub pagination: Pagination,
}

/// Shopify storefront with Judge.me reviews
pub const STOREFRONT: SiteProfile = SiteProfile {
    kind: SiteKind::Storefront,
    product_path_marker: "/products/",
    link_selector: "a[href]",
    product: ProductSelectors {
        name: FieldSelector::text("div.product__title"),
        price: FieldSelector::text("span.price-item.price-item--sale.price-item--last"),
    },
    reviews: ReviewSelectors {
        item: ".jdgm-rev",
        author: FieldSelector::text(".jdgm-rev__author"),
        rating: FieldSelector::attr(".jdgm-rev__rating", "data-score"),
        timestamp: FieldSelector::attr(".jdgm-rev__timestamp", "data-content"),
        body: FieldSelector::text(".jdgm-rev__body"),
        missing_rating: "Not found",
    },
    presence_selector: ".jdgm-rev__body",
    pagination: Pagination::Numbered {
        page_selector: ".jdgm-paginate__page",
        page_attr: "data-page",
        control_template: "a.jdgm-paginate__page[data-page=\"{n}\"]",
    },
};

/// Amazon-style marketplace
pub const MARKETPLACE: SiteProfile = SiteProfile {
    kind: SiteKind::Marketplace,
    product_path_marker: "/dp/",
    link_selector:
        "div[data-component-type=\"s-search-result\"] a.a-link-normal.s-no-outline[href]",
    product: ProductSelectors {
        name: FieldSelector::text("#productTitle"),
        price: FieldSelector::text("span.a-price span.a-offscreen"),
    },
    reviews: ReviewSelectors {
        item: "div[data-hook=\"review\"]",
        author: FieldSelector::text("span.a-profile-name"),
        rating: FieldSelector::text("i.a-icon-star"),
        timestamp: FieldSelector::text("span[data-hook=\"review-date\"]"),
        body: FieldSelector::text("span[data-hook=\"review-body\"]"),
        missing_rating: "No rating",
    },
    presence_selector: "div[data-hook=\"review\"]",
    pagination: Pagination::NextButton {
        next_selector: "li.a-last a",
        disabled_selector: "li.a-last.a-disabled",
    },
};

impl SiteProfile {
    /// Returns the built-in profile for a site kind
    pub fn for_kind(kind: SiteKind) -> &'static SiteProfile {
        match kind {
            SiteKind::Storefront => &STOREFRONT,
            SiteKind::Marketplace => &MARKETPLACE,
        }
    }
}

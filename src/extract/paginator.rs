//! Paginated review extraction
//!
//! Drives a render session through every review page of one product:
//!
//! ```text
//! Init -> WaitingFirstLoad -> NoReviews                        (terminal)
//!                          -> HasReviews -> PerPageExtract <-> AdvancePage
//!                                                      \-> Done (terminal)
//! ```
//!
//! Nothing in here fails the product: a missing first render means zero
//! reviews, and any trouble while paging keeps what was already collected.

use crate::config::RenderConfig;
use crate::extract::field::source_matches;
use crate::extract::reviews::{extract_reviews, review_fingerprint};
use crate::model::Review;
use crate::render::{wait_until_settled, RenderSession, SettleConfig, SettleOutcome};
use crate::site::{Pagination, SiteProfile};
use scraper::{Html, Selector};
use std::time::Duration;

/// States of a single product's extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionState {
    Init,
    WaitingFirstLoad,
    NoReviews,
    /// `total_pages` is `None` when the site only offers a "next" control
    HasReviews { total_pages: Option<u32> },
    PerPageExtract { page: u32 },
    AdvancePage { page: u32 },
    Done(EndReason),
}

/// Why an extraction stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Reviews never rendered within the wait timeout
    NoReviews,
    /// The last page was reached
    LastPage,
    /// The next-page control was not on the page
    ControlMissing,
    /// A page rendered without any review elements
    EmptyPage,
    /// The configured page cap was hit
    PageCap,
    /// The browser reported an error
    RenderFailed,
}

/// Result of extracting one product's reviews
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewExtraction {
    /// Reviews in page order
    pub reviews: Vec<Review>,
    /// Number of pages read
    pub pages: u32,
    pub end: EndReason,
}

/// Collects every review page of a product through a render session
#[derive(Debug, Clone)]
pub struct PaginatedExtractor<'a> {
    profile: &'a SiteProfile,
    wait_timeout: Duration,
    settle: SettleConfig,
    max_pages: Option<u32>,
}

impl<'a> PaginatedExtractor<'a> {
    /// Creates an extractor using the render configuration's timing
    pub fn new(profile: &'a SiteProfile, config: &RenderConfig) -> Self {
        Self::with_timing(
            profile,
            Duration::from_millis(config.wait_timeout),
            SettleConfig::from(config),
            config.max_review_pages,
        )
    }

    pub fn with_timing(
        profile: &'a SiteProfile,
        wait_timeout: Duration,
        settle: SettleConfig,
        max_pages: Option<u32>,
    ) -> Self {
        Self {
            profile,
            wait_timeout,
            settle,
            max_pages,
        }
    }

    /// Loads `url` and collects its reviews across all pages
    pub async fn extract<S>(&self, session: &S, url: &str) -> ReviewExtraction
    where
        S: RenderSession + ?Sized,
    {
        let mut reviews = Vec::new();
        let mut total_pages = None;
        let mut pages_read = 0;
        // Source of the page most recently read, used to decide how to advance
        let mut current_source = String::new();

        let mut state = ExtractionState::Init;
        loop {
            tracing::trace!("{}: {:?}", url, state);

            state = match state {
                ExtractionState::Init => match session.load(url).await {
                    Ok(()) => ExtractionState::WaitingFirstLoad,
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", url, e);
                        ExtractionState::Done(EndReason::RenderFailed)
                    }
                },

                ExtractionState::WaitingFirstLoad => {
                    match session
                        .wait_for(self.profile.presence_selector, self.wait_timeout)
                        .await
                    {
                        Ok(true) => ExtractionState::HasReviews {
                            total_pages: self.count_pages(session).await,
                        },
                        Ok(false) => ExtractionState::NoReviews,
                        Err(e) => {
                            tracing::warn!("Waiting for reviews on {} failed: {}", url, e);
                            ExtractionState::Done(EndReason::RenderFailed)
                        }
                    }
                }

                ExtractionState::NoReviews => {
                    tracing::info!("No reviews found for {}", url);
                    ExtractionState::Done(EndReason::NoReviews)
                }

                ExtractionState::HasReviews { total_pages: total } => {
                    total_pages = total;
                    ExtractionState::PerPageExtract { page: 1 }
                }

                ExtractionState::PerPageExtract { page } => match session.snapshot().await {
                    Ok(source) => {
                        let page_reviews = extract_reviews(&source, &self.profile.reviews);
                        pages_read = page;
                        current_source = source;

                        match total_pages {
                            Some(total) => tracing::info!("Scraped page {} of {}", page, total),
                            None => tracing::info!(
                                "Scraped page {}, total reviews so far: {}",
                                page,
                                reviews.len() + page_reviews.len()
                            ),
                        }

                        if page_reviews.is_empty() && total_pages.is_none() {
                            ExtractionState::Done(EndReason::EmptyPage)
                        } else {
                            reviews.extend(page_reviews);
                            ExtractionState::AdvancePage { page }
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to read page {} of {}: {}", page, url, e);
                        ExtractionState::Done(EndReason::RenderFailed)
                    }
                },

                ExtractionState::AdvancePage { page } => {
                    self.advance(session, page, total_pages, &current_source)
                        .await
                }

                ExtractionState::Done(end) => {
                    return ReviewExtraction {
                        reviews,
                        pages: pages_read,
                        end,
                    };
                }
            };
        }
    }

    /// Total page count for numbered pagination, read once up front
    async fn count_pages<S>(&self, session: &S) -> Option<u32>
    where
        S: RenderSession + ?Sized,
    {
        match self.profile.pagination {
            Pagination::Numbered {
                page_selector,
                page_attr,
                ..
            } => {
                let total = match session.snapshot().await {
                    Ok(source) => max_page_index(&source, page_selector, page_attr),
                    Err(e) => {
                        tracing::warn!("Could not read pagination, assuming one page: {}", e);
                        1
                    }
                };
                Some(total)
            }
            Pagination::NextButton { .. } => None,
        }
    }

    /// Moves from `page` to the next one, or decides the run is over
    async fn advance<S>(
        &self,
        session: &S,
        page: u32,
        total_pages: Option<u32>,
        current_source: &str,
    ) -> ExtractionState
    where
        S: RenderSession + ?Sized,
    {
        let control = match self.profile.pagination {
            Pagination::Numbered { .. } => {
                if page >= total_pages.unwrap_or(1) {
                    return ExtractionState::Done(EndReason::LastPage);
                }
                match self.profile.pagination.control_for_page(page + 1) {
                    Some(control) => control,
                    None => return ExtractionState::Done(EndReason::ControlMissing),
                }
            }
            Pagination::NextButton {
                next_selector,
                disabled_selector,
            } => {
                if source_matches(current_source, disabled_selector) {
                    tracing::info!("Reached the last page");
                    return ExtractionState::Done(EndReason::LastPage);
                }
                next_selector.to_string()
            }
        };

        if self.max_pages.is_some_and(|cap| page >= cap) {
            tracing::info!("Reached review page cap at page {}", page);
            return ExtractionState::Done(EndReason::PageCap);
        }

        let before = review_fingerprint(current_source, &self.profile.reviews);

        match session.click(&control).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("Couldn't load more reviews after page {}", page);
                return ExtractionState::Done(EndReason::ControlMissing);
            }
            Err(e) => {
                tracing::warn!("Couldn't load more reviews after page {}: {}", page, e);
                return ExtractionState::Done(EndReason::RenderFailed);
            }
        }

        let reviews = &self.profile.reviews;
        match wait_until_settled(
            session,
            &before,
            |source| review_fingerprint(source, reviews),
            &self.settle,
        )
        .await
        {
            Ok(SettleOutcome::Settled) => {}
            Ok(SettleOutcome::TimedOut) => tracing::warn!(
                "Page {} did not settle within {:?}; reading it as is",
                page + 1,
                self.settle.timeout
            ),
            Err(e) => {
                tracing::warn!("Lost the page while waiting for page {}: {}", page + 1, e);
                return ExtractionState::Done(EndReason::RenderFailed);
            }
        }

        ExtractionState::PerPageExtract { page: page + 1 }
    }
}

/// Highest page index among pagination controls; 1 when there are none
pub fn max_page_index(source: &str, page_selector: &str, page_attr: &str) -> u32 {
    let Ok(selector) = Selector::parse(page_selector) else {
        return 1;
    };

    Html::parse_document(source)
        .select(&selector)
        .filter_map(|element| element.value().attr(page_attr))
        .filter_map(|value| value.trim().parse::<u32>().ok())
        .max()
        .unwrap_or(1)
        .max(1)
}

//! Browser-driven page rendering
//!
//! Review widgets are filled in by scripts after the initial HTML arrives, so
//! reviews are read through a [`RenderSession`]: a live browser context that can
//! navigate, wait for content, hand back the current DOM as HTML, and click.
//!
//! - [`WebDriverSession`]: the production session (Chrome over WebDriver)
//! - [`wait_until_settled`]: poll-until-stable wait after a page mutation
//! - [`run_scoped`]: owns a session for a block of work and always quits it

mod scope;
mod settle;
mod webdriver;

#[cfg(test)]
pub(crate) mod testing;

pub use scope::run_scoped;
pub use settle::{wait_until_settled, Backoff, SettleConfig, SettleOutcome};
pub use webdriver::WebDriverSession;

use crate::extract::source_matches;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};

/// Interval between presence checks in the default `wait_for`
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Errors raised by a render session
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("Session error: {0}")]
    Session(String),
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// A stateful browser context, bound to one page at a time
#[async_trait]
pub trait RenderSession: Send + Sync {
    /// Navigates to `url` and returns once the document has loaded
    async fn load(&self, url: &str) -> RenderResult<()>;

    /// Returns the current DOM serialized as HTML
    async fn snapshot(&self) -> RenderResult<String>;

    /// Clicks the first element matching `selector` from script, bypassing
    /// visibility and occlusion checks
    ///
    /// Returns `Ok(false)` when nothing matches.
    async fn click(&self, selector: &str) -> RenderResult<bool>;

    /// Ends the browser session
    async fn quit(&self) -> RenderResult<()>;

    /// Waits up to `timeout` for an element matching `selector`
    ///
    /// Returns `Ok(false)` on timeout; absence is an answer, not an error.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> RenderResult<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            let source = self.snapshot().await?;
            if source_matches(&source, selector) {
                return Ok(true);
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            sleep(WAIT_POLL_INTERVAL.min(deadline - now)).await;
        }
    }
}

//! Waiting for asynchronous content replacement to finish
//!
//! After a pagination click the widget swaps its review list in place with no
//! completion signal. Rather than sleeping a fixed interval, the page is polled
//! with exponential backoff until the review region has changed and then held
//! still for one poll. The overall timeout is the fixed-cap fallback.

use crate::config::RenderConfig;
use crate::render::{RenderResult, RenderSession};
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Timing for [`wait_until_settled`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleConfig {
    pub timeout: Duration,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl From<&RenderConfig> for SettleConfig {
    fn from(config: &RenderConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.settle_timeout),
            initial_backoff: Duration::from_millis(config.settle_initial_backoff),
            max_backoff: Duration::from_millis(config.settle_max_backoff),
        }
    }
}

/// How a settle wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// New content appeared and stopped changing
    Settled,
    /// The timeout elapsed first
    TimedOut,
}

/// Doubling delay sequence with a ceiling
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    max: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            current: initial,
            max: max.max(initial),
        }
    }

    /// Returns the next delay and doubles the following one
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }
}

/// Polls until the page's fingerprint differs from `before` and is stable
///
/// `fingerprint` reduces a page snapshot to whatever identifies its current
/// content; an empty fingerprint means "nothing rendered yet" and never counts
/// as settled.
pub async fn wait_until_settled<S, F>(
    session: &S,
    before: &str,
    fingerprint: F,
    config: &SettleConfig,
) -> RenderResult<SettleOutcome>
where
    S: RenderSession + ?Sized,
    F: Fn(&str) -> String + Send + Sync,
{
    let deadline = Instant::now() + config.timeout;
    let mut backoff = Backoff::new(config.initial_backoff, config.max_backoff);
    let mut last_seen: Option<String> = None;

    loop {
        let now = Instant::now();
        if now >= deadline {
            return Ok(SettleOutcome::TimedOut);
        }
        sleep(backoff.next_delay().min(deadline - now)).await;

        let current = fingerprint(&session.snapshot().await?);
        if current.is_empty() || current == before {
            last_seen = None;
            continue;
        }

        if last_seen.as_deref() == Some(current.as_str()) {
            return Ok(SettleOutcome::Settled);
        }
        last_seen = Some(current);
    }
}

//! Chrome over WebDriver

use crate::config::RenderConfig;
use crate::render::{RenderResult, RenderSession, WAIT_POLL_INTERVAL};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use thirtyfour::{By, DesiredCapabilities, WebDriver};
use tokio::time::{sleep, Instant};

/// A render session backed by a chromedriver-controlled browser
pub struct WebDriverSession {
    driver: WebDriver,
}

impl WebDriverSession {
    /// Starts a browser through the configured WebDriver endpoint
    ///
    /// The browser presents `identity` as its user agent so rendered pages
    /// match what the HTTP fetcher sees. Images are not loaded.
    pub async fn connect(config: &RenderConfig, identity: &str) -> RenderResult<Self> {
        let mut caps = DesiredCapabilities::chrome();

        if config.headless {
            caps.add_chrome_arg("--headless")?;
        }

        caps.add_chrome_arg("--no-sandbox")?;
        caps.add_chrome_arg("--disable-dev-shm-usage")?;
        caps.add_chrome_arg("--disable-gpu")?;
        caps.add_chrome_arg(&format!("--user-agent={}", identity))?;

        caps.add_chrome_option(
            "prefs",
            json!({
                "profile.default_content_settings": { "images": 2 },
                "profile.managed_default_content_settings": { "images": 2 }
            }),
        )?;

        tracing::info!("Connecting to WebDriver at {}", config.webdriver_url);
        let driver = WebDriver::new(config.webdriver_url.as_str(), caps).await?;

        Ok(Self { driver })
    }
}

#[async_trait]
impl RenderSession for WebDriverSession {
    async fn load(&self, url: &str) -> RenderResult<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn snapshot(&self) -> RenderResult<String> {
        Ok(self.driver.source().await?)
    }

    async fn click(&self, selector: &str) -> RenderResult<bool> {
        let elements = self.driver.find_all(By::Css(selector)).await?;
        let Some(element) = elements.into_iter().next() else {
            return Ok(false);
        };

        self.driver
            .execute("arguments[0].click();", vec![element.to_json()?])
            .await?;
        Ok(true)
    }

    async fn quit(&self) -> RenderResult<()> {
        self.driver.clone().quit().await?;
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> RenderResult<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if !self.driver.find_all(By::Css(selector)).await?.is_empty() {
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

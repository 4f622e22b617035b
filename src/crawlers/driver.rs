use crate::error::{Result, ScrapeError};
use async_trait::async_trait;
use fantoccini::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;

/// The browser operations the extraction pipeline needs from a loaded page
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to `url`
    async fn goto(&self, url: &str) -> Result<()>;

    /// Current rendered markup
    async fn source(&self) -> Result<String>;

    /// Run a script body in the page and return its JSON result
    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value>;
}

/// A live WebDriver session with per-call timeouts
#[derive(Clone)]
pub struct BrowserPage {
    client: Client,
    page_load_timeout: Duration,
    script_timeout: Duration,
}

impl BrowserPage {
    pub fn new(client: Client, page_load_timeout: Duration, script_timeout: Duration) -> Self {
        Self {
            client,
            page_load_timeout,
            script_timeout,
        }
    }

    /// Ends the WebDriver session behind this page
    pub async fn close(&self) -> Result<()> {
        self.client.clone().close().await?;
        Ok(())
    }
}

#[async_trait]
impl PageDriver for BrowserPage {
    async fn goto(&self, url: &str) -> Result<()> {
        ::log::debug!("GOTO: {}", url);
        match timeout(self.page_load_timeout, self.client.goto(url)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ScrapeError::Timeout(
                self.page_load_timeout.as_secs(),
                "loading page",
            )),
        }
    }

    async fn source(&self) -> Result<String> {
        match timeout(self.script_timeout, self.client.source()).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ScrapeError::Timeout(
                self.script_timeout.as_secs(),
                "reading page source",
            )),
        }
    }

    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        match timeout(self.script_timeout, self.client.execute(script, args)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ScrapeError::Timeout(
                self.script_timeout.as_secs(),
                "running script",
            )),
        }
    }
}

/// Fixed wait for the page to finish rendering
pub async fn settle(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    ::log::debug!("Waiting {:.1}s for the page to settle", delay.as_secs_f64());
    tokio::time::sleep(delay).await;
}

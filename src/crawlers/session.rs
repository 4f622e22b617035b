use crate::config::ScraperConfig;
use crate::crawlers::driver::{BrowserPage, PageDriver};
use crate::error::{Result, ScrapeError};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::time::Duration;

/// A running browser: the page it drives and a way to shut it down
#[async_trait]
pub trait BrowserHandle: Send + Sync {
    fn page(&self) -> &dyn PageDriver;

    async fn close(&self) -> Result<()>;
}

/// Starts browsers on behalf of a [`BrowserSession`]
#[async_trait]
pub trait BrowserConnector: Send + Sync {
    /// Fails with [`ScrapeError::SessionUnavailable`] when no browser could be started
    async fn connect(&self, config: &ScraperConfig) -> Result<Box<dyn BrowserHandle>>;
}

/// Connects to the configured WebDriver server, then to each fallback in turn
#[derive(Debug, Default, Clone, Copy)]
pub struct WebDriverConnector;

#[async_trait]
impl BrowserConnector for WebDriverConnector {
    async fn connect(&self, config: &ScraperConfig) -> Result<Box<dyn BrowserHandle>> {
        let client = connect_with_fallbacks(config, &capabilities(config)).await?;
        Ok(Box::new(BrowserPage::new(
            client,
            Duration::from_secs(config.page_load_timeout_secs),
            Duration::from_secs(config.script_timeout_secs),
        )))
    }
}

#[async_trait]
impl BrowserHandle for BrowserPage {
    fn page(&self) -> &dyn PageDriver {
        self
    }

    async fn close(&self) -> Result<()> {
        BrowserPage::close(self).await
    }
}

async fn connect_with_fallbacks(
    config: &ScraperConfig,
    capabilities: &Map<String, Value>,
) -> Result<Client> {
    match connect_to(&config.webdriver_url, capabilities).await {
        Ok(client) => return Ok(client),
        Err(e) => ::log::error!(
            "Failed to connect to WebDriver at {}: {}",
            config.webdriver_url,
            e
        ),
    }

    for url in &config.fallback_webdriver_urls {
        if *url == config.webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = connect_to(url, capabilities).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(ScrapeError::SessionUnavailable(format!(
        "no WebDriver server accepted a session at {} or its fallbacks",
        config.webdriver_url
    )))
}

async fn connect_to(
    url: &str,
    capabilities: &Map<String, Value>,
) -> std::result::Result<Client, fantoccini::error::NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities.clone());
    builder.connect(url).await
}

/// Chrome capabilities hardened against automation detection
pub fn capabilities(config: &ScraperConfig) -> Map<String, Value> {
    let mut args = vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-extensions".to_string(),
        format!("--user-agent={}", config.user_agent),
        format!("--lang={}", config.accept_language),
    ];
    if config.headless {
        args.insert(0, "--headless=new".to_string());
    }

    let mut capabilities = Map::new();
    capabilities.insert("browserName".to_string(), json!("chrome"));
    capabilities.insert(
        "goog:chromeOptions".to_string(),
        json!({
            "args": args,
            "excludeSwitches": ["enable-automation"],
            "useAutomationExtension": false,
        }),
    );
    capabilities
}

/// Owns the browser for one logical operation
///
/// The browser is started lazily by [`acquire`](Self::acquire) and must be
/// ended with [`release`](Self::release). A session dropped while still
/// holding a browser closes it on the current runtime, so an early return or a
/// panic cannot leak a browser process.
pub struct BrowserSession {
    config: ScraperConfig,
    connector: Arc<dyn BrowserConnector>,
    handle: Option<Box<dyn BrowserHandle>>,
}

impl BrowserSession {
    pub fn new(config: &ScraperConfig, connector: Arc<dyn BrowserConnector>) -> Self {
        Self {
            config: config.clone(),
            connector,
            handle: None,
        }
    }

    /// Returns the page of the running browser, starting one if needed
    pub async fn acquire(&mut self) -> Result<&dyn PageDriver> {
        if self.handle.is_none() {
            ::log::info!("Starting browser session");
            self.handle = Some(self.connector.connect(&self.config).await?);
            ::log::info!("Browser session started");
        }

        self.handle
            .as_deref()
            .map(|handle| handle.page())
            .ok_or_else(|| ScrapeError::SessionUnavailable("browser was not started".to_string()))
    }

    /// Closes the browser if one is running
    pub async fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            match handle.close().await {
                Ok(()) => ::log::info!("Browser session closed"),
                Err(e) => ::log::error!("Failed to close browser session: {}", e),
            }
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        ::log::warn!("Browser session dropped without release, closing it in the background");
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    if let Err(e) = handle.close().await {
                        ::log::error!("Failed to close abandoned browser session: {}", e);
                    }
                });
            }
            Err(_) => ::log::error!("No async runtime available to close the browser session"),
        }
    }
}

pub mod config;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod parsers;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::ScraperConfig;
pub use error::{Result, ScrapeError};
pub use results::{Color, ProductRecord};

use crawlers::probe::{StateProbe, default_probes};
use crawlers::session::{BrowserConnector, BrowserSession, WebDriverConnector};
use crawlers::shop::WalkOptions;
use filter::LinkFilter;
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// Entry point for extracting products and shop listings
///
/// Every call runs in its own browser session, which is closed before the
/// call returns.
pub struct Scraper {
    config: ScraperConfig,
    filter: LinkFilter,
    probes: Vec<Box<dyn StateProbe>>,
    connector: Arc<dyn BrowserConnector>,
}

impl Scraper {
    /// Create a scraper from a configuration
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let filter = LinkFilter::new(config.link_filter.clone())?;
        Ok(Self {
            config,
            filter,
            probes: default_probes(),
            connector: Arc::new(WebDriverConnector),
        })
    }

    /// Load configuration from a JSON file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(ScraperConfig::from_file(path)?)
    }

    /// Override the WebDriver URL
    pub fn with_webdriver_url(mut self, url: &str) -> Self {
        self.config.webdriver_url = url.to_string();
        self
    }

    /// Set the wait after page loads and pagination clicks
    pub fn with_settle_delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.settle_delay_ms = delay_ms;
        self.config.pagination_delay_ms = delay_ms;
        self
    }

    /// Replace the client-state probes, in priority order
    pub fn with_probes(mut self, probes: Vec<Box<dyn StateProbe>>) -> Self {
        self.probes = probes;
        self
    }

    /// Replace how browsers are started
    pub fn with_connector(mut self, connector: impl BrowserConnector + 'static) -> Self {
        self.connector = Arc::new(connector);
        self
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Extract one product page
    ///
    /// `None` means the browser could not be started or the page could not be
    /// loaded. A record equal to [`ProductRecord::empty`] means the page loaded
    /// but nothing recognisable was on it.
    pub async fn extract_product(&self, url: &str) -> Option<ProductRecord> {
        let url = match validate_url(url) {
            Ok(url) => url,
            Err(e) => {
                ::log::error!("Rejected product URL {:?}: {}", url, e);
                return None;
            }
        };

        let mut session = BrowserSession::new(&self.config, Arc::clone(&self.connector));
        let page = match session.acquire().await {
            Ok(page) => page,
            Err(e) => {
                ::log::error!("Could not start a browser for {}: {}", url, e);
                return None;
            }
        };

        let result =
            crawlers::product::fetch_product(page, url.as_str(), &self.config, &self.probes).await;
        session.release().await;

        match result {
            Ok(record) => Some(record),
            Err(e) => {
                ::log::error!("Failed to extract product {}: {}", url, e);
                None
            }
        }
    }

    /// Collect product links from a shop listing, following its pagination
    pub async fn extract_shop_links(
        &self,
        url: &str,
        limit: Option<usize>,
        max_pages: Option<usize>,
    ) -> Vec<String> {
        let url = match validate_url(url) {
            Ok(url) => url,
            Err(e) => {
                ::log::error!("Rejected shop URL {:?}: {}", url, e);
                return Vec::new();
            }
        };
        ::log::info!("Collecting products from shop {}", shop_name(&url));

        let mut session = BrowserSession::new(&self.config, Arc::clone(&self.connector));
        let page = match session.acquire().await {
            Ok(page) => page,
            Err(e) => {
                ::log::error!("Could not start a browser for {}: {}", url, e);
                return Vec::new();
            }
        };

        let options = WalkOptions { limit, max_pages };
        let result = crawlers::shop::walk(page, &url, options, &self.config, &self.filter).await;
        session.release().await;

        match result {
            Ok(walk) => walk.links,
            Err(e) => {
                ::log::error!("Failed to walk shop {}: {}", url, e);
                Vec::new()
            }
        }
    }
}

/// Accepts absolute http(s) URLs only
fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim())?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(ScrapeError::UnsupportedScheme(scheme.to_string())),
    }
}

/// Last path segment of a shop URL, used to label log lines
fn shop_name(url: &Url) -> &str {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or_else(|| url.as_str())
}

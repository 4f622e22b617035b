use crate::error::Result;
use crate::filter::LinkFilterConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Configuration for the marketplace scraper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Site root used to resolve root-relative image and product URLs
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// WebDriver URLs tried when `webdriver_url` refuses the session
    #[serde(default = "default_fallback_webdriver_urls")]
    pub fallback_webdriver_urls: Vec<String>,

    /// Run Chrome without a window
    #[serde(default = "default_true")]
    pub headless: bool,

    /// User agent reported by the browser
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Browser UI language, drives the locale the site renders in
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Wait after loading a page before reading it
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Wait after clicking the next-page control
    #[serde(default = "default_settle_delay_ms")]
    pub pagination_delay_ms: u64,

    /// Maximum scroll-to-bottom passes per listing page
    #[serde(default = "default_scroll_passes")]
    pub scroll_passes: usize,

    /// Wait between scroll passes
    #[serde(default = "default_scroll_delay_ms")]
    pub scroll_delay_ms: u64,

    /// Navigation timeout
    #[serde(default = "default_page_load_timeout_secs")]
    pub page_load_timeout_secs: u64,

    /// Timeout for a single script execution or page source read
    #[serde(default = "default_script_timeout_secs")]
    pub script_timeout_secs: u64,

    /// Label appended to formatted prices
    #[serde(default = "default_currency_label")]
    pub currency_label: String,

    /// Rules for recognising product links on listing pages
    #[serde(default)]
    pub link_filter: LinkFilterConfig,
}

fn default_base_url() -> String {
    "https://uzum.uz".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_fallback_webdriver_urls() -> Vec<String> {
    vec![
        "http://localhost:9515".to_string(), // ChromeDriver default
        "http://127.0.0.1:4444".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36".to_string()
}

fn default_accept_language() -> String {
    "ru-RU".to_string()
}

fn default_settle_delay_ms() -> u64 {
    5000
}

fn default_scroll_passes() -> usize {
    3
}

fn default_scroll_delay_ms() -> u64 {
    1000
}

fn default_page_load_timeout_secs() -> u64 {
    45
}

fn default_script_timeout_secs() -> u64 {
    15
}

fn default_currency_label() -> String {
    "сум".to_string()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            webdriver_url: default_webdriver_url(),
            fallback_webdriver_urls: default_fallback_webdriver_urls(),
            headless: true,
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            settle_delay_ms: default_settle_delay_ms(),
            pagination_delay_ms: default_settle_delay_ms(),
            scroll_passes: default_scroll_passes(),
            scroll_delay_ms: default_scroll_delay_ms(),
            page_load_timeout_secs: default_page_load_timeout_secs(),
            script_timeout_secs: default_script_timeout_secs(),
            currency_label: default_currency_label(),
            link_filter: LinkFilterConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Override the WebDriver URL with the `WEBDRIVER_URL` environment variable if set
    pub fn apply_env(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn pagination_delay(&self) -> Duration {
        Duration::from_millis(self.pagination_delay_ms)
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }

    /// Configuration with every wait removed, for driving scripted pages in tests
    #[cfg(test)]
    pub(crate) fn without_delays() -> Self {
        Self {
            settle_delay_ms: 0,
            pagination_delay_ms: 0,
            scroll_delay_ms: 0,
            ..Self::default()
        }
    }
}

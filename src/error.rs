use thiserror::Error;

/// Errors raised inside the extraction pipeline.
///
/// Most of these never reach the caller of [`crate::Scraper`]: a failing probe
/// or selector is logged and the next strategy is tried.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("No browser session available: {0}")]
    SessionUnavailable(String),

    #[error("WebDriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("Probe {probe} failed: {reason}")]
    Probe { probe: String, reason: String },

    #[error("Could not normalize product data: {0}")]
    Normalization(String),

    #[error("Timed out after {0}s while {1}")]
    Timeout(u64, &'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Configuration file error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid link filter pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ScrapeError {
    pub fn probe(probe: impl Into<String>, reason: impl ToString) -> Self {
        Self::Probe {
            probe: probe.into(),
            reason: reason.to_string(),
        }
    }

    pub fn normalization(reason: impl Into<String>) -> Self {
        Self::Normalization(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

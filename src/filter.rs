use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for deciding which listing hrefs are product detail links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkFilterConfig {
    /// Domain the product links must belong to (subdomains included)
    #[serde(default = "default_required_domain")]
    pub required_domain: Option<String>,

    /// Regex patterns a link must match at least one of (empty means accept all)
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// Regex patterns for links to reject (these take precedence over include patterns)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Whether query strings are dropped when normalizing a link
    #[serde(default = "default_strip_query")]
    pub strip_query: bool,
}

fn default_required_domain() -> Option<String> {
    Some("uzum.uz".to_string())
}

fn default_include_patterns() -> Vec<String> {
    vec![r"/product/[^/?#]+".to_string()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec![r"\.(jpg|jpeg|png|gif|webp|css|js|ico|svg)$".to_string()]
}

fn default_strip_query() -> bool {
    true
}

impl Default for LinkFilterConfig {
    fn default() -> Self {
        Self {
            required_domain: default_required_domain(),
            include_patterns: default_include_patterns(),
            exclude_patterns: default_exclude_patterns(),
            strip_query: default_strip_query(),
        }
    }
}

/// Link filter that uses regex patterns and a domain rule to pick product links
#[derive(Debug)]
pub struct LinkFilter {
    config: LinkFilterConfig,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl LinkFilter {
    /// Create a new link filter from configuration
    pub fn new(config: LinkFilterConfig) -> Result<Self, regex::Error> {
        let include_regexes = config
            .include_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let exclude_regexes = config
            .exclude_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Resolves `href` against `page_url` and returns the normalized link if it
    /// points at a product page
    pub fn accept(&self, href: &str, page_url: &Url) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            return None;
        }

        let resolved = page_url.join(href).ok()?;
        if !self.is_product_link(&resolved) {
            ::log::trace!("Link filter rejected: {}", resolved);
            return None;
        }

        Some(self.normalize_url(&resolved).to_string())
    }

    /// Determine if an absolute URL is a product link based on all filtering rules
    pub fn is_product_link(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        if !self.is_in_domain_scope(url) {
            return false;
        }

        let url_str = url.as_str();
        if self.exclude_regexes.iter().any(|r| r.is_match(url_str)) {
            return false;
        }

        self.include_regexes.is_empty() || self.include_regexes.iter().any(|r| r.is_match(url_str))
    }

    fn is_in_domain_scope(&self, url: &Url) -> bool {
        let Some(required) = &self.config.required_domain else {
            return true;
        };

        match url.domain() {
            Some(domain) => domain == required || domain.ends_with(&format!(".{}", required)),
            None => false,
        }
    }

    /// Create a normalized version of the URL (fragment and, if configured, query removed)
    pub fn normalize_url(&self, url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        if self.config.strip_query {
            normalized.set_query(None);
        }
        normalized
    }
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self::new(LinkFilterConfig::default()).expect("Default link patterns should be valid")
    }
}

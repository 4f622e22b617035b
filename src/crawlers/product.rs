use crate::config::ScraperConfig;
use crate::crawlers::driver::{PageDriver, settle};
use crate::crawlers::probe::{StateProbe, run_probes};
use crate::error::Result;
use crate::parsers::{html, state};
use crate::results::ProductRecord;

/// Loads a product page and extracts its record
///
/// Client state is tried first; if no probe matches, or the matched object
/// cannot be normalized, the rendered markup is parsed instead. Only a failed
/// navigation is an error.
pub async fn fetch_product(
    driver: &dyn PageDriver,
    url: &str,
    config: &ScraperConfig,
    probes: &[Box<dyn StateProbe>],
) -> Result<ProductRecord> {
    ::log::info!("Loading product page: {}", url);
    driver.goto(url).await?;
    settle(config.settle_delay()).await;

    if let Some(found) = run_probes(driver, probes).await {
        match state::normalize(&found.value, url, config) {
            Ok(record) => return Ok(record),
            Err(e) => ::log::warn!(
                "Data from probe '{}' unusable, falling back to markup: {}",
                found.probe,
                e
            ),
        }
    }

    Ok(extract_from_markup(driver, url, config).await)
}

/// Markup fallback; a page whose source cannot be read yields the empty record
async fn extract_from_markup(
    driver: &dyn PageDriver,
    url: &str,
    config: &ScraperConfig,
) -> ProductRecord {
    match driver.source().await {
        Ok(source) => html::parse_product(&source, url, &config.base_url),
        Err(e) => {
            ::log::error!("Failed to read page source for {}: {}", url, e);
            ProductRecord::empty(url)
        }
    }
}

use crate::crawlers::driver::PageDriver;
use crate::crawlers::scripts;
use crate::error::{Result, ScrapeError};
use crate::parsers::{html, state::is_truthy};
use async_trait::async_trait;
use serde_json::Value;

/// One way of asking the rendered page for its in-memory product data
#[async_trait]
pub trait StateProbe: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` when this shape is absent from the page
    async fn probe(&self, driver: &dyn PageDriver) -> Result<Option<Value>>;
}

/// Reads a global state object through an injected script
pub struct ScriptProbe {
    name: &'static str,
    script: &'static str,
}

impl ScriptProbe {
    pub const fn new(name: &'static str, script: &'static str) -> Self {
        Self { name, script }
    }
}

#[async_trait]
impl StateProbe for ScriptProbe {
    fn name(&self) -> &str {
        self.name
    }

    async fn probe(&self, driver: &dyn PageDriver) -> Result<Option<Value>> {
        let value = driver
            .execute(self.script, Vec::new())
            .await
            .map_err(|e| ScrapeError::probe(self.name, e))?;
        Ok(Some(value).filter(is_truthy))
    }
}

/// Reads the `__NEXT_DATA__` JSON that server rendering embeds in the markup
pub struct EmbeddedNextDataProbe;

#[async_trait]
impl StateProbe for EmbeddedNextDataProbe {
    fn name(&self) -> &str {
        "embedded-next-data"
    }

    async fn probe(&self, driver: &dyn PageDriver) -> Result<Option<Value>> {
        let source = driver
            .source()
            .await
            .map_err(|e| ScrapeError::probe(self.name(), e))?;
        Ok(html::embedded_next_data(&source)
            .and_then(|data| data.pointer("/props/pageProps/product").cloned())
            .filter(is_truthy))
    }
}

/// Probes in the order they are tried
pub fn default_probes() -> Vec<Box<dyn StateProbe>> {
    vec![
        Box::new(ScriptProbe::new("initial-state", scripts::INITIAL_STATE_PRODUCT)),
        Box::new(ScriptProbe::new("nuxt", scripts::NUXT_PRODUCT)),
        Box::new(ScriptProbe::new("next-data", scripts::NEXT_DATA_PRODUCT)),
        Box::new(EmbeddedNextDataProbe),
    ]
}

/// The first non-empty probe result
#[derive(Debug, Clone)]
pub struct ProbeMatch {
    pub probe: String,
    pub value: Value,
}

/// Runs `probes` in order and returns the first non-empty result
///
/// A failing probe is logged and skipped; it never stops the sequence.
pub async fn run_probes(
    driver: &dyn PageDriver,
    probes: &[Box<dyn StateProbe>],
) -> Option<ProbeMatch> {
    ::log::info!("Looking for product data in client state");

    for probe in probes {
        match probe.probe(driver).await {
            Ok(Some(value)) => {
                ::log::info!("Got product data from probe '{}'", probe.name());
                return Some(ProbeMatch {
                    probe: probe.name().to_string(),
                    value,
                });
            }
            Ok(None) => ::log::debug!("Probe '{}' found nothing", probe.name()),
            Err(e) => ::log::error!("{}", e),
        }
    }

    ::log::warn!("No client state probe returned product data");
    None
}

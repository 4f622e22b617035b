use crate::config::ScraperConfig;
use crate::crawlers::driver::{PageDriver, settle};
use crate::crawlers::scripts;
use crate::error::Result;
use crate::filter::LinkFilter;
use crate::parsers::{html, state};
use crate::results::product_key;
use serde_json::{Value, json};
use std::collections::HashSet;
use url::Url;

/// Caller supplied bounds for a shop walk; `0` is treated as "no bound"
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    pub limit: Option<usize>,
    pub max_pages: Option<usize>,
}

/// States of the pagination walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    LoadingPage,
    ScanningLinks,
    CheckingNextPage,
    Advancing,
    Done,
}

/// Outcome of walking a shop listing
#[derive(Debug, Clone, Default)]
pub struct ShopWalk {
    /// Distinct products in first-seen order, truncated to the limit
    pub links: Vec<String>,
    pub pages_visited: usize,
    /// Successful next-page clicks
    pub advances: usize,
}

/// Walks a paginated shop listing collecting product links
///
/// Only a failure to load the first page is an error. Failures while scanning
/// a page or looking for the next-page control end that step, not the walk.
pub async fn walk(
    driver: &dyn PageDriver,
    shop_url: &Url,
    options: WalkOptions,
    config: &ScraperConfig,
    filter: &LinkFilter,
) -> Result<ShopWalk> {
    PaginationWalker::new(driver, shop_url, options, config, filter)
        .run()
        .await
}

struct PaginationWalker<'a> {
    driver: &'a dyn PageDriver,
    shop_url: &'a Url,
    options: WalkOptions,
    config: &'a ScraperConfig,
    filter: &'a LinkFilter,
    page: usize,
    advances: usize,
    links: Vec<String>,
    /// Product keys already collected, see [`product_key`]
    seen: HashSet<String>,
}

impl<'a> PaginationWalker<'a> {
    fn new(
        driver: &'a dyn PageDriver,
        shop_url: &'a Url,
        options: WalkOptions,
        config: &'a ScraperConfig,
        filter: &'a LinkFilter,
    ) -> Self {
        Self {
            driver,
            shop_url,
            options,
            config,
            filter,
            page: 0,
            advances: 0,
            links: Vec::new(),
            seen: HashSet::new(),
        }
    }

    async fn run(mut self) -> Result<ShopWalk> {
        let mut state = WalkState::LoadingPage;

        loop {
            ::log::trace!("Walk state: {:?} (page {})", state, self.page);
            state = match state {
                WalkState::LoadingPage => self.load_first_page().await?,
                WalkState::ScanningLinks => self.scan_links().await,
                WalkState::CheckingNextPage => self.check_next_page().await,
                WalkState::Advancing => self.advance().await,
                WalkState::Done => break,
            };
        }

        Ok(self.finish())
    }

    async fn load_first_page(&mut self) -> Result<WalkState> {
        ::log::info!("Loading first shop page: {}", self.shop_url);
        self.driver.goto(self.shop_url.as_str()).await?;
        settle(self.config.settle_delay()).await;
        self.page = 1;
        Ok(WalkState::ScanningLinks)
    }

    async fn scan_links(&mut self) -> WalkState {
        ::log::info!("Processing shop page {}", self.page);
        self.scroll().await;

        let mut found = self.links_from_state().await;
        if found.is_empty() {
            found = self.links_from_markup().await;
            ::log::info!("Found {} product links in markup on page {}", found.len(), self.page);
        } else {
            ::log::info!("Found {} product links in client state on page {}", found.len(), self.page);
        }

        let before = self.links.len();
        for link in found {
            let key = product_key(&link).unwrap_or_else(|| link.clone());
            if self.seen.insert(key) {
                self.links.push(link);
            }
        }
        ::log::debug!("{} new links, {} total", self.links.len() - before, self.links.len());

        WalkState::CheckingNextPage
    }

    /// Scrolls until the page height stops growing or the pass budget runs out
    async fn scroll(&self) {
        let mut last_height: Option<u64> = None;

        for _ in 0..self.config.scroll_passes {
            let height = match self.driver.execute(scripts::SCROLL_TO_BOTTOM, Vec::new()).await {
                Ok(value) => value.as_u64(),
                Err(e) => {
                    ::log::warn!("Scrolling failed on page {}: {}", self.page, e);
                    return;
                }
            };

            if height.is_some() && height == last_height {
                break;
            }
            last_height = height;
            settle(self.config.scroll_delay()).await;
        }
    }

    async fn links_from_state(&self) -> Vec<String> {
        match self.driver.execute(scripts::PRODUCT_LINKS, Vec::new()).await {
            Ok(raw) => {
                state::product_links(&raw, self.shop_url, &self.config.base_url, self.filter)
            }
            Err(e) => {
                ::log::error!("Failed to read product links from client state: {}", e);
                Vec::new()
            }
        }
    }

    async fn links_from_markup(&self) -> Vec<String> {
        match self.driver.source().await {
            Ok(source) => html::parse_product_links(&source, self.shop_url, self.filter),
            Err(e) => {
                ::log::error!("Failed to read listing markup on page {}: {}", self.page, e);
                Vec::new()
            }
        }
    }

    fn page_cap_reached(&self) -> bool {
        matches!(self.options.max_pages, Some(max) if max > 0 && self.page >= max)
    }

    async fn check_next_page(&self) -> WalkState {
        if self.page_cap_reached() {
            ::log::info!("Reached the page limit ({})", self.page);
            return WalkState::Done;
        }

        match self.next_page_control(false).await {
            Ok(true) => WalkState::Advancing,
            Ok(false) => {
                ::log::info!("Reached the last shop page ({})", self.page);
                WalkState::Done
            }
            Err(e) => {
                ::log::error!("Failed to look for the next page control: {}", e);
                WalkState::Done
            }
        }
    }

    async fn advance(&mut self) -> WalkState {
        match self.next_page_control(true).await {
            Ok(true) => {
                self.page += 1;
                self.advances += 1;
                ::log::info!("Moved to shop page {}", self.page);
                settle(self.config.pagination_delay()).await;
                WalkState::ScanningLinks
            }
            Ok(false) => {
                ::log::warn!("Could not move past shop page {}", self.page);
                WalkState::Done
            }
            Err(e) => {
                ::log::error!("Failed to move to the next page: {}", e);
                WalkState::Done
            }
        }
    }

    async fn next_page_control(&self, click: bool) -> Result<bool> {
        let found = self
            .driver
            .execute(scripts::NEXT_PAGE, vec![json!(click)])
            .await?;
        Ok(matches!(found, Value::Bool(true)))
    }

    fn finish(mut self) -> ShopWalk {
        ::log::info!(
            "Found {} unique product links across {} pages",
            self.links.len(),
            self.page
        );

        if let Some(limit) = self.options.limit.filter(|l| *l > 0) {
            if self.links.len() > limit {
                self.links.truncate(limit);
                ::log::info!("Limited product links to {}", limit);
            }
        }

        ShopWalk {
            links: self.links,
            pages_visited: self.page,
            advances: self.advances,
        }
    }
}

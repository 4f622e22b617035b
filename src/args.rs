use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uzum_scrape::{Result, ScraperConfig};

#[derive(Parser, Debug)]
#[command(name = "uzum-scrape")]
#[command(about = "Extracts product data and shop listings from uzum.uz")]
#[command(version)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// WebDriver URL (overrides the config file and WEBDRIVER_URL)
    #[arg(long, global = true)]
    pub webdriver_url: Option<String>,

    /// Show the browser window instead of running headless
    #[arg(long, global = true)]
    pub show_browser: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Extract a single product page
    Product {
        /// Product page URL
        url: String,
    },

    /// Collect product links from a shop, following its pagination
    Shop {
        /// Shop page URL
        url: String,

        /// Maximum number of links to return
        #[arg(short, long)]
        limit: Option<usize>,

        /// Maximum number of listing pages to visit
        #[arg(short = 'p', long)]
        max_pages: Option<usize>,
    },
}

impl Args {
    /// Build the scraper configuration: file, then environment, then flags
    pub fn load_config(&self) -> Result<ScraperConfig> {
        let config = match &self.config {
            Some(path) => ScraperConfig::from_file(path)?,
            None => ScraperConfig::default(),
        };

        let mut config = config.apply_env();
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }
        if self.show_browser {
            config.headless = false;
        }
        Ok(config)
    }
}

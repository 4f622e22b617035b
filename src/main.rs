use clap::Parser;
use std::process::ExitCode;
use uzum_scrape::Scraper;

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let scraper = match args.load_config().and_then(Scraper::new) {
        Ok(scraper) => scraper,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    ::log::debug!("Using WebDriver at {}", scraper.config().webdriver_url);

    let start_time = std::time::Instant::now();
    let (output, found) = match &args.command {
        Command::Product { url } => {
            let record = scraper.extract_product(url).await;
            let found = record.is_some();
            (serde_json::to_string_pretty(&record), found)
        }
        Command::Shop {
            url,
            limit,
            max_pages,
        } => {
            let links = scraper.extract_shop_links(url, *limit, *max_pages).await;
            let found = !links.is_empty();
            (serde_json::to_string_pretty(&links), found)
        }
    };
    ::log::info!(
        "Extraction finished in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            ::log::error!("Failed to serialize result: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if found {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

use clap::Parser;
use listing_scrape::Harvest;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let mut harvest = Harvest::default();
    if let Some(path) = &args.config {
        ::log::info!("Loading configuration from file: {}", path.display());
        harvest = match harvest.with_config_file(path) {
            Ok(harvest) => harvest,
            Err(e) => {
                ::log::error!("Failed to load configuration: {}", e);
                std::process::exit(2);
            }
        };
    }

    // Apply command-line overrides
    if let Some(base_url) = args.base_url {
        harvest = harvest.with_base_url(base_url);
    }
    if let Some(page_size) = args.page_size {
        harvest = harvest.with_page_size(page_size);
    }
    if let Some(max_items) = args.max_items {
        harvest = harvest.with_max_items(max_items);
    }
    if let Some(output) = args.output {
        harvest = harvest.with_output(output);
    }
    if let Some(webdriver_url) = args.webdriver_url {
        harvest = harvest.with_webdriver_url(webdriver_url);
    }
    if args.pretty {
        harvest = harvest.with_pretty(true);
    }
    if args.stop_on_short_page {
        harvest = harvest.with_stop_on_short_page(true);
    }
    match args.replay {
        Some(dir) => harvest = harvest.with_replay_dir(dir),
        None => {
            println!("Note: live scraping requires a WebDriver server (e.g., ChromeDriver).");
            println!(
                "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
            );
        }
    }

    let output = harvest.config().output_path.clone();
    let start_time = std::time::Instant::now();

    match harvest.run().await {
        Ok(report) => {
            println!(
                "Scraped {} listings from {} pages in {:.2} seconds ({} pages failed, {} listings skipped) -> {}",
                report.listings.len(),
                report.pages_attempted,
                start_time.elapsed().as_secs_f64(),
                report.pages_failed,
                report.items_failed,
                output.display()
            );
            if report.writes_failed > 0 {
                ::log::warn!("{} writes to {} failed", report.writes_failed, output.display());
            }
        }
        Err(e) => {
            ::log::error!("Run aborted: {}", e);
            std::process::exit(1);
        }
    }
}

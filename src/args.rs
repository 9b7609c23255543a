use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "listing-scrape")]
#[command(about = "Paginates a vehicle listings site and scrapes every detail page to JSON")]
#[command(version)]
pub struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the site base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Override the number of listings per index page
    #[arg(short, long)]
    pub page_size: Option<usize>,

    /// Override the listing bound the run stops at
    #[arg(short, long)]
    pub max_items: Option<usize>,

    /// Override the output JSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the WebDriver URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Pretty-print the output file
    #[arg(long)]
    pub pretty: bool,

    /// Stop as soon as a page has fewer cards than the page size
    #[arg(long)]
    pub stop_on_short_page: bool,

    /// Serve pages from a directory of saved HTML snapshots, one
    /// `<sanitized url>.html` per page, instead of a live browser
    #[arg(long)]
    pub replay: Option<PathBuf>,
}

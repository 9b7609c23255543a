use crate::cursor::PageCursor;
use crate::error::{Result, ScrapeError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Configuration for a scraping run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Site root; detail links and the search path are resolved against it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Index page path with `{offset}` and `{page_size}` placeholders
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Listings requested per index page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Best known total listing count. Recalibrate by reading the result
    /// count on the site's first search page and rounding up to a page.
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// JSON file rewritten after every page
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Pretty-print the output file
    #[serde(default)]
    pub pretty: bool,

    /// End the run early when a page yields fewer cards than `page_size`
    #[serde(default)]
    pub stop_on_short_page: bool,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default)]
    pub selectors: Selectors,

    #[serde(default)]
    pub stability: StabilityConfig,
}

/// Selectors and patterns describing the site's markup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// One element per listing on the index page
    pub listing_card: String,

    /// Link to the detail page, inside a card
    pub listing_link: String,

    /// Heading holding the vehicle name
    pub name: String,

    /// Tag searched for the price
    pub price_tag: String,

    /// Regex the price text must match
    pub price_pattern: String,

    /// Unlabeled detail fragments
    pub detail_item: String,

    /// Element scrolled into view so lazily loaded cards render
    pub scroll_anchor: Option<String>,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            listing_card: ".inventory-listing".to_string(),
            listing_link: "a".to_string(),
            name: "h1".to_string(),
            price_tag: "span".to_string(),
            price_pattern: r"\$".to_string(),
            detail_item: ".list-condensed".to_string(),
            scroll_anchor: Some("#globalFooter".to_string()),
        }
    }
}

/// How the WebDriver backend decides a page has settled
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Delay between DOM checks
    pub poll_interval_ms: u64,

    /// Consecutive unchanged checks required
    pub settle_polls: u32,

    /// Give up waiting after this long
    pub timeout_secs: u64,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
            settle_polls: 3,
            timeout_secs: 30,
        }
    }
}

impl StabilityConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Default value for base_url
fn default_base_url() -> String {
    "https://www.kbb.com".to_string()
}

/// Default value for search_path
fn default_search_path() -> String {
    "/cars-for-sale/all/toyota/tacoma?firstRecord={offset}&numRecords={page_size}&newSearch=true&searchRadius=500".to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_max_items() -> usize {
    6000
}

fn default_output_path() -> PathBuf {
    PathBuf::from("out.json")
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_path: default_search_path(),
            page_size: default_page_size(),
            max_items: default_max_items(),
            output_path: default_output_path(),
            pretty: false,
            stop_on_short_page: false,
            webdriver_url: default_webdriver_url(),
            selectors: Selectors::default(),
            stability: StabilityConfig::default(),
        }
    }
}

impl ScrapeConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Check the values a run cannot proceed without
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(ScrapeError::Config("page_size must be at least 1".into()));
        }
        Url::parse(&self.base_url)?;
        Regex::new(&self.selectors.price_pattern)?;

        if !self.search_path.contains("{offset}") {
            ::log::warn!(
                "search_path has no {{offset}} placeholder; every page will load the same URL"
            );
        }
        Ok(())
    }

    /// Fresh cursor for this run
    pub fn cursor(&self) -> PageCursor {
        PageCursor::new(self.page_size, self.max_items)
    }

    /// Absolute URL of the index page at the cursor
    pub fn page_url(&self, cursor: &PageCursor) -> Result<String> {
        let path = self
            .search_path
            .replace("{offset}", &cursor.offset().to_string())
            .replace("{page_size}", &cursor.page_size().to_string());
        Ok(Url::parse(&self.base_url)?.join(&path)?.to_string())
    }

    /// Absolute URL of a detail page from a site-relative href
    pub fn detail_url(&self, href: &str) -> Result<String> {
        Ok(Url::parse(&self.base_url)?.join(href)?.to_string())
    }
}

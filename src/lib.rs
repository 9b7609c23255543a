// Re-export modules
pub mod browser;
pub mod classify;
pub mod config;
pub mod cursor;
pub mod error;
pub mod results;
pub mod runner;
pub mod scrape;
pub mod store;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::ScrapeConfig;
pub use cursor::PageCursor;
pub use error::{BrowserError, Result, ScrapeError};
pub use results::Listing;
pub use runner::{Harvester, RunReport};

use browser::{Browser, SnapshotBrowser, WebDriverBrowser};
use std::path::{Path, PathBuf};

/// Main builder for a scraping run
pub struct Harvest {
    config: ScrapeConfig,
    replay_dir: Option<PathBuf>,
    webdriver_url_set: bool,
}

impl Default for Harvest {
    fn default() -> Self {
        Self::new(ScrapeConfig::default())
    }
}

impl Harvest {
    /// Create a new builder from a configuration
    pub fn new(config: ScrapeConfig) -> Self {
        Self {
            config,
            replay_dir: None,
            webdriver_url_set: false,
        }
    }

    /// Load configuration from a file
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.config = ScrapeConfig::from_file(path)?;
        Ok(self)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.config.page_size = page_size;
        self
    }

    /// Set the listing bound the run stops at
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.config.max_items = max_items;
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.config.pretty = pretty;
        self
    }

    pub fn with_stop_on_short_page(mut self, stop: bool) -> Self {
        self.config.stop_on_short_page = stop;
        self
    }

    /// Use this WebDriver server; takes precedence over `WEBDRIVER_URL`
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.config.webdriver_url = url.into();
        self.webdriver_url_set = true;
        self
    }

    /// Serve pages from saved snapshots instead of a live browser
    pub fn with_replay_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.replay_dir = Some(dir.into());
        self
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Override the WebDriver URL with `WEBDRIVER_URL` unless one was set
    /// explicitly
    fn apply_env_webdriver_url(&mut self, env_url: Option<String>) {
        if self.webdriver_url_set {
            return;
        }
        if let Some(webdriver_url) = env_url.filter(|url| !url.is_empty()) {
            self.config.webdriver_url = webdriver_url;
        }
    }

    /// Run against the backend this builder was configured for
    pub async fn run(mut self) -> Result<RunReport> {
        self.apply_env_webdriver_url(std::env::var("WEBDRIVER_URL").ok());
        self.config.validate()?;

        if let Some(dir) = &self.replay_dir {
            let browser = SnapshotBrowser::from_dir(dir)?;
            if browser.page_count() == 0 {
                ::log::warn!("No .html snapshots in {}; every page will fail", dir.display());
            }
            return self.run_with(&browser).await;
        }

        ::log::info!("Connecting to WebDriver at {}", self.config.webdriver_url);
        let browser =
            WebDriverBrowser::connect(&self.config.webdriver_url, self.config.stability).await?;
        let report = self.run_with(&browser).await;
        browser.shutdown().await;
        report
    }

    /// Run against any browser backend
    pub async fn run_with<B: Browser>(&self, browser: &B) -> Result<RunReport> {
        Harvester::new(browser, &self.config).run().await
    }
}

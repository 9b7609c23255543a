use crate::browser::{Browser, Tab};
use crate::config::ScrapeConfig;
use crate::error::Result;
use crate::results::Listing;
use crate::scrape::ListingPageScraper;
use crate::store::JsonStore;

/// Outcome of a complete run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Every listing scraped, in the order pages and cards were visited
    pub listings: Vec<Listing>,
    pub pages_attempted: usize,
    pub pages_failed: usize,
    pub items_failed: usize,
    pub writes_failed: usize,
    /// Cursor offset when the loop stopped
    pub final_offset: usize,
}

/// Drives the page loop: scrape, accumulate, persist, advance
pub struct Harvester<'a, B: Browser> {
    browser: &'a B,
    config: &'a ScrapeConfig,
    store: JsonStore,
}

impl<'a, B: Browser> Harvester<'a, B> {
    pub fn new(browser: &'a B, config: &'a ScrapeConfig) -> Self {
        Self {
            browser,
            config,
            store: JsonStore::new(&config.output_path).pretty(config.pretty),
        }
    }

    /// Scrape every page up to the configured bound.
    ///
    /// Page, item and write failures are logged and counted; only setup
    /// failures (bad configuration, no index tab) end the run with an error.
    pub async fn run(&self) -> Result<RunReport> {
        self.config.validate()?;
        let scraper = ListingPageScraper::new(self.browser, self.config)?;
        let mut cursor = self.config.cursor();
        let mut report = RunReport::default();
        let mut unsaved = false;

        ::log::info!(
            "Scraping up to {} listings, {} per page ({} pages)",
            cursor.max_items(),
            cursor.page_size(),
            cursor.total_pages()
        );

        let index = self.browser.open_tab().await?;
        while cursor.has_next() {
            report.pages_attempted += 1;
            let mut exhausted = false;

            match scraper.scrape_page(&index, &cursor).await {
                Ok(page) => {
                    report.items_failed += page.items_failed;
                    exhausted = page.cards_found < cursor.page_size();
                    report.listings.extend(page.listings);
                }
                Err(e) => {
                    ::log::error!("Error scraping page at offset {}: {}", cursor.offset(), e);
                    report.pages_failed += 1;
                }
            }

            match self.store.save(&report.listings).await {
                Ok(_) => unsaved = false,
                Err(e) => {
                    ::log::error!("Error writing to {}: {}", self.store.path().display(), e);
                    report.writes_failed += 1;
                    unsaved = true;
                }
            }

            cursor.advance();

            if exhausted && self.config.stop_on_short_page {
                ::log::info!(
                    "Page ended short of {} cards; treating the listings as exhausted",
                    cursor.page_size()
                );
                break;
            }
        }

        if unsaved {
            ::log::info!("Retrying final write of {} listings", report.listings.len());
            if let Err(e) = self.store.save(&report.listings).await {
                ::log::error!("Final write to {} failed: {}", self.store.path().display(), e);
                report.writes_failed += 1;
            }
        }

        if let Err(e) = index.close().await {
            ::log::warn!("Failed to close index tab: {}", e);
        }

        report.final_offset = cursor.offset();
        ::log::info!(
            "Run complete: {} listings from {} pages ({} pages failed, {} items skipped)",
            report.listings.len(),
            report.pages_attempted,
            report.pages_failed,
            report.items_failed
        );
        Ok(report)
    }
}

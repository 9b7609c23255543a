use crate::browser::{Browser, Element, Tab};
use crate::config::ScrapeConfig;
use crate::cursor::PageCursor;
use crate::error::{BrowserError, Result, ScrapeError};
use crate::results::Listing;
use crate::scrape::detail::DetailExtractor;

/// What one index page produced
#[derive(Debug, Clone, Default)]
pub struct PageReport {
    /// Successfully extracted listings, in page order
    pub listings: Vec<Listing>,

    /// Listing cards present on the page
    pub cards_found: usize,

    /// Cards whose extraction failed and were skipped
    pub items_failed: usize,
}

/// Scrapes index pages, one detail visit per listing card
pub struct ListingPageScraper<'a, B: Browser> {
    browser: &'a B,
    config: &'a ScrapeConfig,
    extractor: DetailExtractor,
}

impl<'a, B: Browser> ListingPageScraper<'a, B> {
    pub fn new(browser: &'a B, config: &'a ScrapeConfig) -> Result<Self> {
        Ok(Self {
            browser,
            config,
            extractor: DetailExtractor::new(config)?,
        })
    }

    /// Load the index page at `cursor` in `index` and extract every listing.
    ///
    /// Only page-level problems are errors. A card that fails is logged and
    /// skipped; an empty page is a normal, empty report.
    pub async fn scrape_page(&self, index: &B::Tab, cursor: &PageCursor) -> Result<PageReport> {
        let url = self.config.page_url(cursor)?;
        ::log::info!("Loading index page {}", url);
        index.navigate(&url).await?;
        index.wait_until_stable().await?;
        self.scroll_to_anchor(index).await;

        let selector = &self.config.selectors.listing_card;
        let cards = index
            .find_all(selector)
            .await
            .map_err(|source| ScrapeError::ListingsNotFound {
                selector: selector.clone(),
                source,
            })?;
        ::log::info!("Begin scraping {} items", cards.len());

        let report = self.scrape_cards(&cards).await;
        ::log::info!(
            "Finished scraping {}-{}, retrieved {} records",
            cursor.offset(),
            cursor.page_end(),
            report.listings.len()
        );
        Ok(report)
    }

    /// Run the detail extractor over each card, keeping DOM order
    pub async fn scrape_cards<E: Element>(&self, cards: &[E]) -> PageReport {
        let mut report = PageReport {
            cards_found: cards.len(),
            ..PageReport::default()
        };

        for (position, card) in cards.iter().enumerate() {
            match self.extractor.extract(self.browser, card).await {
                Ok(listing) => report.listings.push(listing),
                Err(e) => {
                    ::log::warn!("Skipping listing {} on page: {}", position + 1, e);
                    report.items_failed += 1;
                }
            }
        }
        report
    }

    /// Bring the configured anchor into view so lazily loaded cards render
    async fn scroll_to_anchor(&self, index: &B::Tab) {
        let Some(anchor) = &self.config.selectors.scroll_anchor else {
            return;
        };

        let scrolled = match index.find(anchor).await {
            Ok(element) => element.scroll_into_view().await,
            Err(e) => Err(e),
        };
        match scrolled {
            Ok(()) => {}
            Err(BrowserError::NoSuchElement(_)) => {
                ::log::warn!("Scroll anchor `{}` not found; some cards may not be loaded", anchor)
            }
            Err(e) => ::log::warn!("Failed to scroll to `{}`: {}", anchor, e),
        }
    }
}

use crate::browser::{Browser, Element, Tab};
use crate::classify::Classifier;
use crate::config::{ScrapeConfig, Selectors};
use crate::error::{BrowserError, Result, ScrapeError};
use crate::results::Listing;
use regex::Regex;

/// Builds one [`Listing`] per index card by visiting its detail page
pub struct DetailExtractor {
    config: ScrapeConfig,
    price_pattern: Regex,
    classifier: Classifier,
}

impl DetailExtractor {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            price_pattern: Regex::new(&config.selectors.price_pattern)?,
            classifier: Classifier::default(),
        })
    }

    fn selectors(&self) -> &Selectors {
        &self.config.selectors
    }

    /// Replace the default field classifier
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Resolve the card's link and scrape the page behind it.
    ///
    /// The detail page is opened in its own tab, which is closed before this
    /// returns on every path.
    pub async fn extract<B, E>(&self, browser: &B, card: &E) -> Result<Listing>
    where
        B: Browser,
        E: Element,
    {
        let href = match card.find(&self.selectors().listing_link).await {
            Ok(link) => link.attr("href").await?,
            Err(BrowserError::NoSuchElement(_)) => None,
            Err(e) => return Err(e.into()),
        };
        let href = href
            .filter(|h| !h.trim().is_empty())
            .ok_or(ScrapeError::LinkNotFound)?;
        let link = self.config.detail_url(href.trim())?;

        let tab = browser.open_tab().await?;
        let result = self.read_detail_page(&tab, link).await;
        if let Err(e) = tab.close().await {
            ::log::warn!("Failed to close detail tab: {}", e);
        }
        result
    }

    /// Load `link` in `tab` and read the listing off it
    pub async fn read_detail_page<T: Tab>(&self, tab: &T, link: String) -> Result<Listing> {
        ::log::debug!("Opening detail page {}", link);
        tab.navigate(&link).await?;
        tab.wait_until_stable().await?;

        let name = tab
            .find(&self.selectors().name)
            .await
            .map_err(|source| ScrapeError::MissingField {
                field: "name",
                source,
            })?
            .text()
            .await?;
        let price = tab
            .find_by_text(&self.selectors().price_tag, &self.price_pattern)
            .await
            .map_err(|source| ScrapeError::MissingField {
                field: "price",
                source,
            })?
            .text()
            .await?;

        let mut listing = Listing::new(name, price, link);
        let details = tab.find_all(&self.selectors().detail_item).await?;
        let mut classified = 0;
        for detail in &details {
            let text = detail.text().await?;
            if self.classifier.apply(&mut listing, &text) > 0 {
                classified += 1;
            }
        }

        ::log::debug!(
            "Scraped {:?}: {} of {} details classified",
            listing.name,
            classified,
            details.len()
        );
        Ok(listing)
    }
}

use crate::browser::snapshot::{SnapshotElement, SnapshotTab};
use crate::browser::{Browser, SnapshotBrowser, Tab};
use crate::classify::{Classifier, Field, Needle, Rule};
use crate::error::{BrowserError, BrowserResult, ScrapeError};
use crate::results::Listing;
use crate::scrape::DetailExtractor;
use crate::scrape::tests::fixtures::*;
use async_trait::async_trait;
use regex::Regex;
use std::path::PathBuf;

#[cfg(test)]
mod tests {
    use super::*;

    /// Opens the index page and returns the tab plus its listing cards
    async fn cards(browser: &SnapshotBrowser) -> (SnapshotTab, Vec<SnapshotElement>) {
        let index = browser.open_tab().await.unwrap();
        index.navigate(&index_url(0, 2)).await.unwrap();
        let cards = index.find_all(".inventory-listing").await.unwrap();
        (index, cards)
    }

    /// Snapshot browser whose tabs always fail to close
    struct StuckBrowser(SnapshotBrowser);

    struct StuckTab(SnapshotTab);

    #[async_trait]
    impl Browser for StuckBrowser {
        type Tab = StuckTab;

        async fn open_tab(&self) -> BrowserResult<StuckTab> {
            Ok(StuckTab(self.0.open_tab().await?))
        }
    }

    #[async_trait]
    impl Tab for StuckTab {
        type Element = SnapshotElement;

        async fn navigate(&self, url: &str) -> BrowserResult<()> {
            self.0.navigate(url).await
        }

        async fn wait_until_stable(&self) -> BrowserResult<()> {
            self.0.wait_until_stable().await
        }

        async fn find(&self, selector: &str) -> BrowserResult<SnapshotElement> {
            self.0.find(selector).await
        }

        async fn find_all(&self, selector: &str) -> BrowserResult<Vec<SnapshotElement>> {
            self.0.find_all(selector).await
        }

        async fn find_by_text(&self, tag: &str, pattern: &Regex) -> BrowserResult<SnapshotElement> {
            self.0.find_by_text(tag, pattern).await
        }

        async fn close(self) -> BrowserResult<()> {
            Err(BrowserError::Script("no such window".to_string()))
        }
    }

    fn extractor() -> DetailExtractor {
        DetailExtractor::new(&test_config(2, 2, PathBuf::from("unused.json"))).unwrap()
    }

    #[tokio::test]
    async fn test_extracts_full_listing() {
        let browser = SnapshotBrowser::new()
            .with_page(&index_url(0, 2), index_page(&[Some("/listing/1")]))
            .with_page(
                &detail_url("/listing/1"),
                detail_page(
                    "2020 Tacoma",
                    "$28,000",
                    &[
                        "45,000 miles",
                        "Engine: V6",
                        "Transmission: 6-Speed Automatic",
                        "4-Wheel Drive",
                        "Clean title",
                    ],
                ),
            );
        let (_index, cards) = cards(&browser).await;

        let listing = extractor().extract(&browser, &cards[0]).await.unwrap();

        let expected = Listing {
            name: "2020 Tacoma".to_string(),
            price: "$28,000".to_string(),
            mileage: "45,000 miles".to_string(),
            engine: "Engine: V6".to_string(),
            transmission: "Transmission: 6-Speed Automatic".to_string(),
            drive_train: "4-Wheel Drive".to_string(),
            link: "https://example.test/listing/1".to_string(),
            ..Listing::default()
        };
        assert_eq!(listing, expected);
        // Only the index tab is left open
        assert_eq!(browser.open_tabs(), 1);
    }

    #[tokio::test]
    async fn test_card_without_link() {
        let browser =
            SnapshotBrowser::new().with_page(&index_url(0, 2), index_page(&[None]));
        let (_index, cards) = cards(&browser).await;

        let result = extractor().extract(&browser, &cards[0]).await;

        assert!(matches!(result, Err(ScrapeError::LinkNotFound)));
        assert_eq!(browser.open_tabs(), 1);
    }

    #[tokio::test]
    async fn test_link_without_href() {
        let index = r#"<html><body>
            <div class="inventory-listing"><a name="top">Used Toyota</a></div>
            <div class="inventory-listing"><a href="  ">Used Toyota</a></div>
        </body></html>"#;
        let browser = SnapshotBrowser::new().with_page(&index_url(0, 2), index);
        let (_index, cards) = cards(&browser).await;

        for card in &cards {
            let result = extractor().extract(&browser, card).await;
            assert!(matches!(result, Err(ScrapeError::LinkNotFound)));
        }
    }

    #[tokio::test]
    async fn test_missing_price_closes_tab() {
        let browser = SnapshotBrowser::new()
            .with_page(&index_url(0, 2), index_page(&[Some("/listing/1")]))
            .with_page(
                &detail_url("/listing/1"),
                detail_page("2020 Tacoma", "Call for price", &["45,000 miles"]),
            );
        let (_index, cards) = cards(&browser).await;

        let result = extractor().extract(&browser, &cards[0]).await;

        match result {
            Err(ScrapeError::MissingField { field, source }) => {
                assert_eq!(field, "price");
                assert!(matches!(source, BrowserError::NoTextMatch { .. }));
            }
            other => panic!("expected missing price, got {:?}", other),
        }
        assert_eq!(browser.open_tabs(), 1);
    }

    #[tokio::test]
    async fn test_missing_name() {
        let browser = SnapshotBrowser::new()
            .with_page(&index_url(0, 2), index_page(&[Some("/listing/1")]))
            .with_page(
                &detail_url("/listing/1"),
                "<html><body><span>$28,000</span></body></html>",
            );
        let (_index, cards) = cards(&browser).await;

        let result = extractor().extract(&browser, &cards[0]).await;

        assert!(matches!(
            result,
            Err(ScrapeError::MissingField { field: "name", .. })
        ));
        assert_eq!(browser.open_tabs(), 1);
    }

    #[tokio::test]
    async fn test_navigation_failure_closes_tab() {
        // The detail page was never saved
        let browser = SnapshotBrowser::new()
            .with_page(&index_url(0, 2), index_page(&[Some("/listing/404")]));
        let (_index, cards) = cards(&browser).await;

        let result = extractor().extract(&browser, &cards[0]).await;

        assert!(matches!(
            result,
            Err(ScrapeError::Browser(BrowserError::Navigation { .. }))
        ));
        assert_eq!(browser.open_tabs(), 1);
    }

    #[tokio::test]
    async fn test_custom_classifier() {
        let browser = SnapshotBrowser::new()
            .with_page(&index_url(0, 2), index_page(&[Some("/listing/1")]))
            .with_page(
                &detail_url("/listing/1"),
                detail_page("2020 Tacoma", "$28,000", &["Odometer: 45,000", "45,000 miles"]),
            );
        let (_index, cards) = cards(&browser).await;
        let classifier = Classifier::new(vec![Rule {
            needle: Needle::Exact("Odometer"),
            field: Field::Mileage,
        }]);

        let listing = extractor()
            .with_classifier(classifier)
            .extract(&browser, &cards[0])
            .await
            .unwrap();

        assert_eq!(listing.mileage, "Odometer: 45,000");
    }

    #[tokio::test]
    async fn test_close_failure_keeps_listing() {
        let browser = SnapshotBrowser::new()
            .with_page(&index_url(0, 2), index_page(&[Some("/listing/1"), Some("/listing/2")]))
            .with_page(
                &detail_url("/listing/1"),
                detail_page("2020 Tacoma", "$28,000", &["45,000 miles"]),
            )
            .with_page(
                &detail_url("/listing/2"),
                detail_page("2019 Tacoma", "$26,500", &["61,000 miles"]),
            );
        let (_index, cards) = cards(&browser).await;
        let stuck = StuckBrowser(browser);

        let first = extractor().extract(&stuck, &cards[0]).await.unwrap();
        let second = extractor().extract(&stuck, &cards[1]).await.unwrap();

        assert_eq!(first.name, "2020 Tacoma");
        assert_eq!(first.mileage, "45,000 miles");
        assert_eq!(second.name, "2019 Tacoma");
        assert_eq!(second.link, "https://example.test/listing/2");
    }
}

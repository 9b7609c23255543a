use crate::browser::{Browser, SnapshotBrowser, Tab};
use crate::cursor::PageCursor;
use crate::error::{BrowserError, ScrapeError};
use crate::scrape::ListingPageScraper;
use crate::scrape::tests::fixtures::*;
use std::path::PathBuf;

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SnapshotBrowser {
        SnapshotBrowser::new()
            .with_page(
                &index_url(0, 3),
                index_page(&[Some("/listing/1"), None, Some("/listing/2")]),
            )
            .with_page(
                &detail_url("/listing/1"),
                detail_page("2019 Tacoma", "$31,500", &["30,100 miles"]),
            )
            .with_page(
                &detail_url("/listing/2"),
                detail_page("2021 Tacoma", "$39,900", &["Exterior: Blue"]),
            )
    }

    #[tokio::test]
    async fn test_scrapes_cards_in_page_order() {
        let browser = site();
        let config = test_config(3, 3, PathBuf::from("unused.json"));
        let scraper = ListingPageScraper::new(&browser, &config).unwrap();
        let index = browser.open_tab().await.unwrap();

        let report = scraper
            .scrape_page(&index, &PageCursor::new(3, 3))
            .await
            .unwrap();

        assert_eq!(report.cards_found, 3);
        assert_eq!(report.items_failed, 1);
        let names: Vec<&str> = report.listings.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["2019 Tacoma", "2021 Tacoma"]);
        assert_eq!(report.listings[1].exterior, "Exterior: Blue");

        index.close().await.unwrap();
        assert_eq!(browser.open_tabs(), 0);
    }

    #[tokio::test]
    async fn test_empty_page_is_not_an_error() {
        let browser = SnapshotBrowser::new().with_page(&index_url(0, 3), index_page(&[]));
        let config = test_config(3, 3, PathBuf::from("unused.json"));
        let scraper = ListingPageScraper::new(&browser, &config).unwrap();
        let index = browser.open_tab().await.unwrap();

        let report = scraper
            .scrape_page(&index, &PageCursor::new(3, 3))
            .await
            .unwrap();

        assert_eq!(report.cards_found, 0);
        assert!(report.listings.is_empty());
        assert_eq!(report.items_failed, 0);
    }

    #[tokio::test]
    async fn test_missing_scroll_anchor_only_warns() {
        let browser = site().with_page(
            &index_url(0, 3),
            r#"<div class="inventory-listing"><a href="/listing/1">Used</a></div>"#,
        );
        let config = test_config(3, 3, PathBuf::from("unused.json"));
        let scraper = ListingPageScraper::new(&browser, &config).unwrap();
        let index = browser.open_tab().await.unwrap();

        let report = scraper
            .scrape_page(&index, &PageCursor::new(3, 3))
            .await
            .unwrap();

        assert_eq!(report.listings.len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_index_page_fails_page() {
        let browser = site();
        let config = test_config(3, 9, PathBuf::from("unused.json"));
        let scraper = ListingPageScraper::new(&browser, &config).unwrap();
        let index = browser.open_tab().await.unwrap();
        let mut cursor = PageCursor::new(3, 9);
        cursor.advance();

        let result = scraper.scrape_page(&index, &cursor).await;

        assert!(matches!(
            result,
            Err(ScrapeError::Browser(BrowserError::Navigation { .. }))
        ));
    }

    #[tokio::test]
    async fn test_bad_card_selector_fails_page() {
        let browser = site();
        let mut config = test_config(3, 3, PathBuf::from("unused.json"));
        config.selectors.listing_card = "[[".to_string();
        let scraper = ListingPageScraper::new(&browser, &config).unwrap();
        let index = browser.open_tab().await.unwrap();

        let result = scraper.scrape_page(&index, &PageCursor::new(3, 3)).await;

        assert!(matches!(
            result,
            Err(ScrapeError::ListingsNotFound {
                source: BrowserError::InvalidSelector(_),
                ..
            })
        ));
    }
}

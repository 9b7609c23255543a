//! Rendering engine capability used by the scrapers.
//!
//! The pipeline only needs a handful of operations from a browser: open a tab,
//! navigate it, wait for it to settle, look elements up and read them. Any
//! backend providing those can drive a run.

pub mod snapshot;
pub mod webdriver;

use crate::error::BrowserResult;
use async_trait::async_trait;
use regex::Regex;

pub use snapshot::SnapshotBrowser;
pub use webdriver::WebDriverBrowser;

/// A source of isolated browsing contexts
#[async_trait]
pub trait Browser: Send + Sync {
    type Tab: Tab;

    /// Open a new tab. The caller owns it and must `close` it.
    async fn open_tab(&self) -> BrowserResult<Self::Tab>;
}

/// One browsing context
#[async_trait]
pub trait Tab: Sized + Send + Sync {
    type Element: Element;

    async fn navigate(&self, url: &str) -> BrowserResult<()>;

    /// Block until the page's dynamic content has finished loading
    async fn wait_until_stable(&self) -> BrowserResult<()>;

    /// First element matching a CSS selector
    async fn find(&self, selector: &str) -> BrowserResult<Self::Element>;

    /// All elements matching a CSS selector, in document order
    async fn find_all(&self, selector: &str) -> BrowserResult<Vec<Self::Element>>;

    /// First `tag` element whose text matches `pattern`
    async fn find_by_text(&self, tag: &str, pattern: &Regex) -> BrowserResult<Self::Element>;

    async fn close(self) -> BrowserResult<()>;
}

/// Handle to an element inside a tab
#[async_trait]
pub trait Element: Sized + Send + Sync {
    /// First descendant matching a CSS selector
    async fn find(&self, selector: &str) -> BrowserResult<Self>;

    /// Rendered text, trimmed
    async fn text(&self) -> BrowserResult<String>;

    async fn attr(&self, name: &str) -> BrowserResult<Option<String>>;

    async fn scroll_into_view(&self) -> BrowserResult<()>;
}

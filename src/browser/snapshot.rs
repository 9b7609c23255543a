use crate::browser::{Browser, Element, Tab};
use crate::error::{BrowserError, BrowserResult};
use crate::utils::{collapse_whitespace, normalize_url, sanitize_filename};
use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Browser that serves saved HTML instead of rendering live pages
///
/// Pages are keyed by the sanitized form of their URL, so a directory of
/// snapshots holds one `<sanitized url>.html` file per page. Scripts never
/// run: a snapshot is already in its stable state.
#[derive(Debug, Clone, Default)]
pub struct SnapshotBrowser {
    pages: Arc<HashMap<String, String>>,
    open_tabs: Arc<AtomicUsize>,
}

impl SnapshotBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the HTML served for `url`
    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.pages).insert(page_key(url), html.into());
        self
    }

    /// Load every `.html` file in `dir`
    pub fn from_dir(dir: impl AsRef<Path>) -> BrowserResult<Self> {
        let mut pages = HashMap::new();
        for entry in std::fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("html") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            pages.insert(stem.to_string(), std::fs::read_to_string(&path)?);
        }

        ::log::info!(
            "Loaded {} page snapshots from {}",
            pages.len(),
            dir.as_ref().display()
        );
        Ok(Self {
            pages: Arc::new(pages),
            open_tabs: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// File name (without extension) a snapshot of `url` is stored under
    pub fn snapshot_name(url: &str) -> String {
        page_key(url)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Tabs opened and not yet closed
    pub fn open_tabs(&self) -> usize {
        self.open_tabs.load(Ordering::SeqCst)
    }
}

fn page_key(url: &str) -> String {
    sanitize_filename(&normalize_url(url))
}

#[async_trait]
impl Browser for SnapshotBrowser {
    type Tab = SnapshotTab;

    async fn open_tab(&self) -> BrowserResult<SnapshotTab> {
        self.open_tabs.fetch_add(1, Ordering::SeqCst);
        Ok(SnapshotTab {
            pages: Arc::clone(&self.pages),
            current: Mutex::new(None),
            open_tabs: Arc::clone(&self.open_tabs),
        })
    }
}

/// A tab showing at most one snapshot at a time
pub struct SnapshotTab {
    pages: Arc<HashMap<String, String>>,
    current: Mutex<Option<String>>,
    open_tabs: Arc<AtomicUsize>,
}

impl SnapshotTab {
    fn current_html(&self) -> BrowserResult<String> {
        let current = self.current.lock().map_err(|_| BrowserError::NoPage)?;
        current.clone().ok_or(BrowserError::NoPage)
    }
}

#[async_trait]
impl Tab for SnapshotTab {
    type Element = SnapshotElement;

    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        let html = self
            .pages
            .get(&page_key(url))
            .ok_or_else(|| BrowserError::Navigation {
                url: url.to_string(),
                reason: "no snapshot for this URL".to_string(),
            })?;
        let mut current = self.current.lock().map_err(|_| BrowserError::NoPage)?;
        *current = Some(html.clone());
        Ok(())
    }

    async fn wait_until_stable(&self) -> BrowserResult<()> {
        self.current_html().map(|_| ())
    }

    async fn find(&self, selector: &str) -> BrowserResult<SnapshotElement> {
        let html = self.current_html()?;
        select(&Html::parse_document(&html), selector)?
            .into_iter()
            .next()
            .ok_or_else(|| BrowserError::NoSuchElement(selector.to_string()))
    }

    async fn find_all(&self, selector: &str) -> BrowserResult<Vec<SnapshotElement>> {
        let html = self.current_html()?;
        select(&Html::parse_document(&html), selector)
    }

    async fn find_by_text(&self, tag: &str, pattern: &Regex) -> BrowserResult<SnapshotElement> {
        let html = self.current_html()?;
        select(&Html::parse_document(&html), tag)?
            .into_iter()
            .find(|element| pattern.is_match(&element.text))
            .ok_or_else(|| BrowserError::NoTextMatch {
                tag: tag.to_string(),
                pattern: pattern.as_str().to_string(),
            })
    }

    async fn close(self) -> BrowserResult<()> {
        self.open_tabs.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

/// An element captured from a snapshot
#[derive(Debug, Clone)]
pub struct SnapshotElement {
    html: String,
    text: String,
    attrs: HashMap<String, String>,
}

impl SnapshotElement {
    fn capture(element: ElementRef<'_>) -> Self {
        let text = element.text().collect::<Vec<_>>().join(" ");
        Self {
            html: element.html(),
            text: collapse_whitespace(&text),
            attrs: element
                .value()
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl Element for SnapshotElement {
    async fn find(&self, selector: &str) -> BrowserResult<Self> {
        let parsed = parse_selector(selector)?;
        let fragment = Html::parse_fragment(&self.html);
        // The fragment wraps the captured element; search below it only
        fragment
            .root_element()
            .children()
            .find_map(ElementRef::wrap)
            .and_then(|element| element.select(&parsed).next())
            .map(SnapshotElement::capture)
            .ok_or_else(|| BrowserError::NoSuchElement(selector.to_string()))
    }

    async fn text(&self) -> BrowserResult<String> {
        Ok(self.text.clone())
    }

    async fn attr(&self, name: &str) -> BrowserResult<Option<String>> {
        Ok(self.attrs.get(name).cloned())
    }

    async fn scroll_into_view(&self) -> BrowserResult<()> {
        Ok(())
    }
}

fn parse_selector(selector: &str) -> BrowserResult<Selector> {
    Selector::parse(selector).map_err(|_| BrowserError::InvalidSelector(selector.to_string()))
}

fn select(doc: &Html, selector: &str) -> BrowserResult<Vec<SnapshotElement>> {
    let parsed = parse_selector(selector)?;
    Ok(doc.select(&parsed).map(SnapshotElement::capture).collect())
}

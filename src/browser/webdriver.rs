use crate::browser::{Browser, Element, Tab};
use crate::config::StabilityConfig;
use crate::error::{BrowserError, BrowserResult};
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::wd::WindowHandle;
use fantoccini::{Client, ClientBuilder, Locator};
use regex::Regex;
use std::time::Instant;

/// Reports document readiness and a cheap DOM size measure in one round trip
const STABILITY_PROBE: &str =
    "return [document.readyState, document.getElementsByTagName('*').length];";

/// Browser backed by a WebDriver session; each tab is a WebDriver window
pub struct WebDriverBrowser {
    client: Client,
    stability: StabilityConfig,
}

impl WebDriverBrowser {
    /// Connect to a WebDriver server, trying common local ports if the
    /// configured URL does not answer
    pub async fn connect(webdriver_url: &str, stability: StabilityConfig) -> BrowserResult<Self> {
        let client = connect_to_webdriver(webdriver_url).await?;
        Ok(Self { client, stability })
    }

    /// End the WebDriver session
    pub async fn shutdown(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
    }
}

/// Connects to the WebDriver instance
async fn connect_to_webdriver(webdriver_url: &str) -> BrowserResult<Client> {
    let first_error = match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e
        }
    };

    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://localhost:4444", // geckodriver / Selenium default
        "http://127.0.0.1:4444", // Try with IP instead of localhost
    ];

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(first_error.into())
}

#[async_trait]
impl Browser for WebDriverBrowser {
    type Tab = WebDriverTab;

    async fn open_tab(&self) -> BrowserResult<WebDriverTab> {
        let previous = self.client.window().await?;
        let opened = self.client.new_window(true).await?;
        self.client.switch_to_window(opened.handle.clone()).await?;
        ::log::trace!("Opened WebDriver window {:?}", opened.handle);

        Ok(WebDriverTab {
            client: self.client.clone(),
            handle: opened.handle,
            previous,
            stability: self.stability,
        })
    }
}

/// A WebDriver window
///
/// The session has a single focused window shared by every tab, so each
/// command first switches to the window it belongs to. Closing a tab
/// returns focus to the window that was current when it was opened.
pub struct WebDriverTab {
    client: Client,
    handle: WindowHandle,
    previous: WindowHandle,
    stability: StabilityConfig,
}

impl WebDriverTab {
    async fn focus(&self) -> BrowserResult<()> {
        focus_window(&self.client, &self.handle).await
    }

    fn element(&self, inner: fantoccini::elements::Element) -> WebDriverElement {
        WebDriverElement {
            inner,
            client: self.client.clone(),
            window: self.handle.clone(),
        }
    }
}

#[async_trait]
impl Tab for WebDriverTab {
    type Element = WebDriverElement;

    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.focus().await?;
        self.client
            .goto(url)
            .await
            .map_err(|e| navigation_error(e, url))
    }

    async fn wait_until_stable(&self) -> BrowserResult<()> {
        let started = Instant::now();
        let mut last_count = None;
        let mut unchanged = 0;

        loop {
            self.focus().await?;
            let probe = self.client.execute(STABILITY_PROBE, Vec::new()).await?;
            let ready = probe.get(0).and_then(|v| v.as_str()) == Some("complete");
            let count = probe
                .get(1)
                .and_then(|v| v.as_u64())
                .ok_or_else(|| BrowserError::Script(probe.to_string()))?;

            if ready && last_count == Some(count) {
                unchanged += 1;
            } else {
                unchanged = 0;
            }
            last_count = Some(count);

            if unchanged >= self.stability.settle_polls {
                ::log::trace!(
                    "Page settled at {} elements after {:.2}s",
                    count,
                    started.elapsed().as_secs_f64()
                );
                return Ok(());
            }
            if started.elapsed() >= self.stability.timeout() {
                return Err(BrowserError::Unstable(self.stability.timeout()));
            }
            tokio::time::sleep(self.stability.poll_interval()).await;
        }
    }

    async fn find(&self, selector: &str) -> BrowserResult<WebDriverElement> {
        self.focus().await?;
        self.client
            .find(Locator::Css(selector))
            .await
            .map(|inner| self.element(inner))
            .map_err(|e| lookup_error(e, selector))
    }

    async fn find_all(&self, selector: &str) -> BrowserResult<Vec<WebDriverElement>> {
        self.focus().await?;
        let elements = self
            .client
            .find_all(Locator::Css(selector))
            .await
            .map_err(|e| lookup_error(e, selector))?;
        Ok(elements.into_iter().map(|inner| self.element(inner)).collect())
    }

    async fn find_by_text(&self, tag: &str, pattern: &Regex) -> BrowserResult<WebDriverElement> {
        for candidate in self.find_all(tag).await? {
            if pattern.is_match(&candidate.text().await?) {
                return Ok(candidate);
            }
        }
        Err(BrowserError::NoTextMatch {
            tag: tag.to_string(),
            pattern: pattern.as_str().to_string(),
        })
    }

    async fn close(self) -> BrowserResult<()> {
        let closed = match self.focus().await {
            Ok(()) => self.client.close_window().await.map_err(BrowserError::from),
            Err(e) => Err(e),
        };
        // Restore focus even if the close failed
        let restored = focus_window(&self.client, &self.previous).await;
        closed.and(restored)
    }
}

/// Element handle inside a WebDriver window
pub struct WebDriverElement {
    inner: fantoccini::elements::Element,
    client: Client,
    window: WindowHandle,
}

impl WebDriverElement {
    async fn focus(&self) -> BrowserResult<()> {
        focus_window(&self.client, &self.window).await
    }
}

#[async_trait]
impl Element for WebDriverElement {
    async fn find(&self, selector: &str) -> BrowserResult<Self> {
        self.focus().await?;
        self.inner
            .find(Locator::Css(selector))
            .await
            .map(|inner| WebDriverElement {
                inner,
                client: self.client.clone(),
                window: self.window.clone(),
            })
            .map_err(|e| lookup_error(e, selector))
    }

    async fn text(&self) -> BrowserResult<String> {
        self.focus().await?;
        Ok(self.inner.text().await?.trim().to_string())
    }

    async fn attr(&self, name: &str) -> BrowserResult<Option<String>> {
        self.focus().await?;
        Ok(self.inner.attr(name).await?)
    }

    async fn scroll_into_view(&self) -> BrowserResult<()> {
        self.focus().await?;
        let target = serde_json::to_value(&self.inner)?;
        self.client
            .execute("arguments[0].scrollIntoView(true);", vec![target])
            .await?;
        Ok(())
    }
}

/// Switch the session to `window`
async fn focus_window(client: &Client, window: &WindowHandle) -> BrowserResult<()> {
    client.switch_to_window(window.clone()).await?;
    Ok(())
}

/// Maps a lookup failure, keeping "nothing matched" distinct from transport errors
fn lookup_error(error: CmdError, selector: &str) -> BrowserError {
    if error.is_no_such_element() {
        BrowserError::NoSuchElement(selector.to_string())
    } else {
        error.into()
    }
}

/// Handles errors that occur during navigation
fn navigation_error(error: CmdError, url: &str) -> BrowserError {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost WebDriver session while loading {}", url);
    }
    BrowserError::Navigation {
        url: url.to_string(),
        reason: error.to_string(),
    }
}

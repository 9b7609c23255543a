use std::time::Duration;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, ScrapeError>;

pub type BrowserResult<T> = core::result::Result<T, BrowserError>;

/// Failures reported by a rendering backend
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("no element matches `{0}`")]
    NoSuchElement(String),

    #[error("no <{tag}> element has text matching /{pattern}/")]
    NoTextMatch { tag: String, pattern: String },

    #[error("failed to load {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("page did not settle within {0:?}")]
    Unstable(Duration),

    #[error("invalid selector `{0}`")]
    InvalidSelector(String),

    #[error("no page has been loaded in this tab")]
    NoPage,

    #[error("WebDriver session error: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("WebDriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("unexpected script result: {0}")]
    Script(String),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the scraping pipeline
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("listing has no link to its detail page")]
    LinkNotFound,

    #[error("detail page is missing its {field}: {source}")]
    MissingField {
        field: &'static str,
        #[source]
        source: BrowserError,
    },

    #[error("listing cards `{selector}` not found: {source}")]
    ListingsNotFound {
        selector: String,
        #[source]
        source: BrowserError,
    },

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}

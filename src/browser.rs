use headless_chrome::LaunchOptions;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::ParseError;

use crate::pdf::PdfLayout;
use crate::webpage::WebPage;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("ChromeError: {0}")]
    ChromeError(#[from] anyhow::Error),
    #[error("UrlError, can't parse given URL: {0}")]
    UrlError(#[from] ParseError),
    #[error("timed out after {0:?} waiting for {1}")]
    Timeout(Duration, String),
}
pub type Result<T> = std::result::Result<T, BrowserError>;

/// A rendering engine able to hand out isolated pages.
pub trait RenderEngine {
    type Page: PageSession;

    fn open_page(&self) -> Result<Self::Page>;

    /// Ends the session; pages handed out earlier become unusable.
    fn close(self) -> Result<()>;
}

/// One open page of a [`RenderEngine`].
pub trait PageSession {
    /// Default timeout for navigation and every later page action.
    fn set_timeouts(&self, timeout: Duration);

    fn emulate_print_media(&self) -> Result<()>;

    /// Starts loading `url`; returns once the navigation is committed.
    /// Errors mean no response.
    fn navigate(&self, url: &str) -> Result<()>;

    /// HTTP status of the main document, when the engine knows it.
    fn response_status(&self) -> Result<Option<u16>>;

    fn evaluate(&self, script: &str) -> Result<Option<Value>>;

    fn add_style(&self, css: &str) -> Result<()>;

    fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Serialized HTML of the current document.
    fn content(&self) -> Result<String>;

    fn title(&self) -> Result<String>;

    fn print_to_pdf(&self, layout: &PdfLayout) -> Result<Vec<u8>>;
}

/// Headless Chrome, launched once per capture.
pub struct Browser(headless_chrome::Browser);

impl Browser {
    /// `idle_timeout` must outlast the longest page action, otherwise Chrome
    /// drops the connection mid-wait.
    pub fn new(idle_timeout: Duration) -> Result<Self> {
        let options = LaunchOptions {
            headless: true,
            idle_browser_timeout: idle_timeout,
            ..Default::default()
        };
        Ok(Self(headless_chrome::Browser::new(options)?))
    }
}

impl RenderEngine for Browser {
    type Page = WebPage;

    fn open_page(&self) -> Result<WebPage> {
        let tab = self.0.new_tab()?;
        Ok(WebPage::from_tab(tab))
    }

    fn close(self) -> Result<()> {
        // dropping the handle kills the Chrome process
        drop(self.0);
        tracing::debug!("browser closed");
        Ok(())
    }
}

use headless_chrome::protocol::cdp::Emulation;
use headless_chrome::util::Timeout;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::browser::{BrowserError, PageSession, Result};
use crate::pdf::PdfLayout;
use crate::style;

/// Status of the main document from the Navigation Timing entry.
const NAVIGATION_STATUS: &str =
    "(() => { const nav = performance.getEntriesByType('navigation')[0]; \
     return nav ? nav.responseStatus : null; })()";

/// Only a genuine wait timeout becomes [`BrowserError::Timeout`]; anything
/// else (lost connection, bad selector) keeps the engine's error.
fn selector_wait_error(e: anyhow::Error, timeout: Duration, selector: &str) -> BrowserError {
    if e.downcast_ref::<Timeout>().is_some() {
        BrowserError::Timeout(timeout, selector.to_string())
    } else {
        BrowserError::ChromeError(e)
    }
}

/// A Chrome tab driven through the DevTools protocol.
pub struct WebPage(Arc<headless_chrome::Tab>);

impl WebPage {
    pub fn from_tab(tab: Arc<headless_chrome::Tab>) -> Self {
        Self(tab)
    }
}

impl PageSession for WebPage {
    fn set_timeouts(&self, timeout: Duration) {
        self.0.set_default_timeout(timeout);
    }

    fn emulate_print_media(&self) -> Result<()> {
        self.0.call_method(Emulation::SetEmulatedMedia {
            media: Some("print".to_string()),
            features: None,
        })?;
        Ok(())
    }

    fn navigate(&self, url: &str) -> Result<()> {
        Url::parse(url)?;
        self.0.navigate_to(url)?;
        Ok(())
    }

    fn response_status(&self) -> Result<Option<u16>> {
        let status = self
            .evaluate(NAVIGATION_STATUS)?
            .and_then(|v| v.as_u64())
            .and_then(|s| u16::try_from(s).ok());
        Ok(status)
    }

    fn evaluate(&self, script: &str) -> Result<Option<Value>> {
        let object = self.0.evaluate(script, false)?;
        Ok(object.value)
    }

    fn add_style(&self, css: &str) -> Result<()> {
        self.evaluate(&style::style_tag_script(css))?;
        Ok(())
    }

    fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        self.0
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map_err(|e| selector_wait_error(e, timeout, selector))?;
        Ok(())
    }

    fn content(&self) -> Result<String> {
        Ok(self.0.get_content()?)
    }

    fn title(&self) -> Result<String> {
        Ok(self.0.get_title()?)
    }

    fn print_to_pdf(&self, layout: &PdfLayout) -> Result<Vec<u8>> {
        Ok(self.0.print_to_pdf(Some(layout.into()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_timeout_maps_to_timeout() {
        let err = selector_wait_error(Timeout.into(), Duration::from_secs(30), "main");
        assert!(matches!(err, BrowserError::Timeout(_, ref s) if s == "main"));
        assert_eq!(err.to_string(), "timed out after 30s waiting for main");
    }

    #[test]
    fn other_engine_errors_are_kept() {
        let err = selector_wait_error(
            anyhow::anyhow!("Unable to make method calls because underlying connection is closed"),
            Duration::from_secs(30),
            "main",
        );
        assert!(matches!(err, BrowserError::ChromeError(_)));
        assert!(err.to_string().contains("connection is closed"));
    }
}

use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;
use time::OffsetDateTime;

use crate::browser::{BrowserError, PageSession, RenderEngine};
use crate::config::{CaptureConfig, NamingScheme};
use crate::output::{self, OutputDirectory, OutputError};
use crate::{slug, style};

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to load page {url}: {source}")]
    NoResponse {
        url: String,
        #[source]
        source: BrowserError,
    },
    #[error("Failed to load page {url}: {status}")]
    BadStatus { url: String, status: u16 },
    #[error("BrowserError: {0}")]
    Browser(#[from] BrowserError),
    #[error("OutputError: {0}")]
    Output(#[from] OutputError),
}

pub type Result<T> = std::result::Result<T, CaptureError>;

/// True once the new document is parsed (`DOMContentLoaded` is due or fired).
const DOM_READY: &str =
    "document.readyState !== 'loading' && location.href !== 'about:blank'";
const DOM_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The best-effort steps of a capture.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Theme,
    ContentLandmark,
}

/// A failure that was recovered from without aborting the capture.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Warning {
    pub step: Step,
    pub reason: String,
}

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Done,
    Recovered(Warning),
}

impl Outcome {
    fn of<T>(step: Step, result: std::result::Result<T, BrowserError>) -> Self {
        match result {
            Ok(_) => Outcome::Done,
            Err(e) => Outcome::Recovered(Warning { step, reason: e.to_string() }),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct CaptureReport {
    pub url: String,
    pub path: PathBuf,
    pub status: Option<u16>,
    pub title: Option<String>,
    pub warnings: Vec<Warning>,
    pub captured_at: String,
}

/// Unknown (`None`) and `0` (file and data URLs) count as loaded, like 2xx/3xx.
pub fn is_ok_status(status: Option<u16>) -> bool {
    match status {
        None | Some(0) => true,
        Some(code) => (200..400).contains(&code),
    }
}

/// Logs the file name this run is expected to produce.
pub fn announce(output: &OutputDirectory, naming: NamingScheme) -> Result<u64> {
    let sequence = output.peek_next()?;
    match naming {
        NamingScheme::Numbered => {
            tracing::info!("Rendering {}", output::file_name(sequence, None))
        }
        NamingScheme::NumberedWithSlug => {
            tracing::info!("Rendering {}", output::format_prefix(sequence))
        }
    }
    Ok(sequence)
}

/// Polls until the DOM is ready, without waiting for subresources.
/// Script errors while the old document is torn down count as not ready.
fn wait_for_dom_ready<P: PageSession>(
    page: &P,
    timeout: Duration,
) -> std::result::Result<(), BrowserError> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Ok(Some(Value::Bool(true))) = page.evaluate(DOM_READY) {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(BrowserError::Timeout(timeout, "DOMContentLoaded".to_string()));
        }
        std::thread::sleep(DOM_POLL_INTERVAL);
    }
}

fn apply_light_theme<P: PageSession>(page: &P) -> Outcome {
    Outcome::of(Step::Theme, page.evaluate(style::LIGHT_THEME_SCRIPT))
}

fn await_content<P: PageSession>(page: &P, config: &CaptureConfig) -> Outcome {
    Outcome::of(
        Step::ContentLandmark,
        page.wait_for_selector(&config.content_selector, config.content_timeout),
    )
}

fn page_title<P: PageSession>(page: &P) -> String {
    let reported = page.title().ok();
    match page.content() {
        Ok(html) => slug::extract_title(&html, reported.as_deref()),
        Err(e) => {
            tracing::debug!("can't read page content: {}", e);
            slug::extract_title("", reported.as_deref())
        }
    }
}

/// Renders `url` to a new PDF in `output` and closes the engine.
pub fn capture<E: RenderEngine>(
    engine: E,
    url: &str,
    config: &CaptureConfig,
    output: &OutputDirectory,
) -> Result<CaptureReport> {
    let mut warnings = Vec::new();

    let page = engine.open_page()?;
    page.set_timeouts(config.action_timeout);
    page.emulate_print_media()?;

    tracing::info!("Opening: {}", url);
    let no_response = |source| CaptureError::NoResponse {
        url: url.to_string(),
        source,
    };
    page.navigate(url).map_err(no_response)?;
    wait_for_dom_ready(&page, config.action_timeout).map_err(no_response)?;
    let status = page.response_status().map_err(no_response)?;
    if !is_ok_status(status) {
        return Err(CaptureError::BadStatus {
            url: url.to_string(),
            status: status.unwrap_or_default(),
        });
    }

    std::thread::sleep(config.settle_delay);

    if let Outcome::Recovered(warning) = apply_light_theme(&page) {
        tracing::debug!("light theme not applied: {}", warning.reason);
        warnings.push(warning);
    }

    page.add_style(style::PRINTABLE_CODE_CSS)?;

    let title = match config.naming {
        NamingScheme::Numbered => None,
        NamingScheme::NumberedWithSlug => Some(page_title(&page)),
    };
    let slug = title.as_deref().map(slug::sanitize);

    if let Outcome::Recovered(warning) = await_content(&page, config) {
        tracing::warn!("Warning: main content not detected, continuing ({})", warning.reason);
        warnings.push(warning);
    }

    let pdf = page.print_to_pdf(&config.layout)?;
    let path = output.write_next(slug.as_deref(), &pdf)?;

    drop(page);
    engine.close()?;

    let captured_at = OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
        .to_string();

    Ok(CaptureReport {
        url: url.to_string(),
        path,
        status,
        title,
        warnings,
        captured_at,
    })
}

use clap::Parser;
use clap::error::ErrorKind;
use std::process::ExitCode;

use crate::browser::Browser;
use crate::capture::{self, CaptureError, CaptureReport};
use crate::config::{CaptureConfig, NamingScheme};
use crate::logger;
use crate::output::OutputDirectory;

/// Chrome must outlive the longest single wait of a capture.
const IDLE_MARGIN: std::time::Duration = std::time::Duration::from_secs(30);

/// Saves a webpage as a print-ready PDF into ./pdf using a headless browser
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// URL of the webpage to render
    pub url: String,
}

fn execute(url: &str, config: &CaptureConfig) -> Result<CaptureReport, CaptureError> {
    let output = OutputDirectory::ensure(&config.output_directory)?;
    capture::announce(&output, config.naming)?;

    let browser = Browser::new(config.action_timeout + IDLE_MARGIN)?;
    capture::capture(browser, url, config, &output)
}

/// Entry point shared by the binaries; they differ only in file naming.
pub fn run(naming: NamingScheme) -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(1);
        }
    };

    logger::init_cli_logger();

    let config = CaptureConfig::default().with_naming(naming);
    if let Ok(json) = serde_json::to_string(&config) {
        tracing::debug!("configuration: {}", json);
    }

    match execute(&args.url, &config) {
        Ok(report) => {
            if let Ok(json) = serde_json::to_string(&report) {
                tracing::debug!("report: {}", json);
            }
            println!("Saved to: {}", report.path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!("capture failed: {:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

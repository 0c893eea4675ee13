use std::process::ExitCode;
use webpage_pdf::cli;
use webpage_pdf::config::NamingScheme;

/// Renders a webpage to `pdf/NNNNNN.pdf`
fn main() -> ExitCode {
    cli::run(NamingScheme::Numbered)
}

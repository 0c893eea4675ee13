use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::pdf::PdfLayout;

/// How the output file is named once the sequence number is known.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingScheme {
    /// `000042.pdf`
    Numbered,
    /// `000042-getting-started.pdf`
    NumberedWithSlug,
}

/// Everything a single capture run can be tuned with.
#[derive(Serialize, Debug, Clone)]
pub struct CaptureConfig {
    pub output_directory: PathBuf,
    pub naming: NamingScheme,
    #[serde(with = "millis")]
    pub action_timeout: Duration,
    #[serde(with = "millis")]
    pub settle_delay: Duration,
    pub content_selector: String,
    #[serde(with = "millis")]
    pub content_timeout: Duration,
    pub layout: PdfLayout,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("pdf"),
            naming: NamingScheme::NumberedWithSlug,
            action_timeout: Duration::from_secs(120),
            settle_delay: Duration::from_millis(1500),
            content_selector: "main".to_string(),
            content_timeout: Duration::from_secs(30),
            layout: PdfLayout::default(),
        }
    }
}

impl CaptureConfig {
    pub fn with_naming(mut self, naming: NamingScheme) -> Self {
        self.naming = naming;
        self
    }
}

mod millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}

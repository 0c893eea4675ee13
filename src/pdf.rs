use headless_chrome::types::PrintToPdfOptions;
use serde::Serialize;

const MM_PER_INCH: f64 = 25.4;

/// Paper size in millimetres.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PaperSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PaperSize {
    pub const A4: PaperSize = PaperSize { width_mm: 210.0, height_mm: 297.0 };
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top_mm: f64,
    pub bottom_mm: f64,
    pub left_mm: f64,
    pub right_mm: f64,
}

/// Page geometry of the emitted PDF.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PdfLayout {
    pub paper: PaperSize,
    pub margins: Margins,
    pub print_background: bool,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            paper: PaperSize::A4,
            margins: Margins {
                top_mm: 15.0,
                bottom_mm: 15.0,
                left_mm: 12.0,
                right_mm: 12.0,
            },
            print_background: true,
        }
    }
}

fn inches(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

impl From<&PdfLayout> for PrintToPdfOptions {
    // Chrome takes paper and margin sizes in inches.
    fn from(layout: &PdfLayout) -> Self {
        PrintToPdfOptions {
            landscape: Some(false),
            display_header_footer: Some(false),
            print_background: Some(layout.print_background),
            paper_width: Some(inches(layout.paper.width_mm)),
            paper_height: Some(inches(layout.paper.height_mm)),
            margin_top: Some(inches(layout.margins.top_mm)),
            margin_bottom: Some(inches(layout.margins.bottom_mm)),
            margin_left: Some(inches(layout.margins.left_mm)),
            margin_right: Some(inches(layout.margins.right_mm)),
            prefer_css_page_size: Some(false),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.map(|a| (a - b).abs() < 1e-3).unwrap_or(false)
    }

    #[test]
    fn a4_with_fixed_margins() {
        let options = PrintToPdfOptions::from(&PdfLayout::default());

        assert!(close(options.paper_width, 8.268));
        assert!(close(options.paper_height, 11.693));
        assert!(close(options.margin_top, 0.591));
        assert!(close(options.margin_bottom, 0.591));
        assert!(close(options.margin_left, 0.472));
        assert!(close(options.margin_right, 0.472));
        assert_eq!(options.print_background, Some(true));
    }
}

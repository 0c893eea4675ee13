use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

pub const FALLBACK: &str = "page";
pub const MAX_LEN: usize = 80;

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug pattern"));

/// Lower-cases, hyphenates every run outside `[a-z0-9]`, trims hyphens and
/// caps the result at [`MAX_LEN`] characters.
pub fn sanitize(title: &str) -> String {
    let lowered = title.to_lowercase();
    let hyphenated = NON_ALNUM.replace_all(&lowered, "-");
    let truncated: String = hyphenated
        .trim_matches('-')
        .chars()
        .take(MAX_LEN)
        .collect();

    match truncated.trim_end_matches('-') {
        "" => FALLBACK.to_string(),
        slug => slug.to_string(),
    }
}

fn text_of(element: scraper::ElementRef) -> Option<String> {
    let text = element.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

/// Picks the title of a rendered page: the first `h1` of the main content,
/// then the document `<title>`, then `fallback_title` (as reported by the
/// browser), then `"page"`.
pub fn extract_title(html: &str, fallback_title: Option<&str>) -> String {
    let document = Html::parse_document(html);
    let heading = Selector::parse("main h1").expect("valid heading selector");
    let title = Selector::parse("title").expect("valid title selector");

    document
        .select(&heading)
        .next()
        .and_then(text_of)
        .or_else(|| document.select(&title).next().and_then(text_of))
        .or_else(|| {
            fallback_title
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| FALLBACK.to_string())
}

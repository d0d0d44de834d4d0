//! Bounded reduction of raw HTML to its main content region.
//!
//! The reducer never fails: worst case it hands back a truncated slice of
//! the cleaned document. Output feeds a completion prompt, so the size
//! ceiling matters more than fidelity.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use tracing::debug;

/// Structural heuristics tried in order. Semantic containers win over
/// generic ones, so the order is a deliberate tie-break.
const CONTENT_SELECTORS: [&str; 4] = [
    "main",
    "article",
    "div[class*=\"content\"], div[id*=\"content\"], \
     div[class*=\"product\"], div[id*=\"product\"], \
     div[class*=\"property\"], div[id*=\"property\"]",
    "section",
];

/// Reduce a raw HTML document to its most relevant region, capped at
/// `max_chars` characters.
///
/// Tries each selector in [`CONTENT_SELECTORS`] and returns the inner
/// markup of the first match. When nothing matches, strips script, style,
/// header, footer and nav blocks from the whole document and keeps the
/// `<body>` contents if present.
///
/// The `max_chars` ceiling is applied on every path, not just the
/// cleaned-whole-document fallback: a matched container can be as large
/// as the page itself, and the orchestrator's tighter prompt budget
/// truncates again downstream either way.
pub fn reduce(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);

    for selector_str in CONTENT_SELECTORS {
        let selector = Selector::parse(selector_str).unwrap();
        if let Some(element) = document.select(&selector).next() {
            debug!("Reducer matched selector: {}", selector_str);
            return truncate_chars(&element.inner_html(), max_chars);
        }
    }

    debug!("No content container matched, cleaning whole document");
    truncate_chars(&strip_chrome(html), max_chars)
}

/// Remove non-content blocks from a whole document and extract the body.
fn strip_chrome(html: &str) -> String {
    static STRIP_RES: OnceLock<Vec<Regex>> = OnceLock::new();
    static BODY_RE: OnceLock<Regex> = OnceLock::new();

    let strip_res = STRIP_RES.get_or_init(|| {
        ["script", "style", "header", "footer", "nav"]
            .iter()
            .map(|tag| Regex::new(&format!(r"(?is)<{tag}[^>]*>.*?</{tag}>")).unwrap())
            .collect()
    });

    let mut cleaned = html.to_string();
    for re in strip_res {
        cleaned = re.replace_all(&cleaned, "").into_owned();
    }

    let body_re = BODY_RE.get_or_init(|| Regex::new(r"(?is)<body[^>]*>(.*)</body>").unwrap());
    if let Some(captures) = body_re.captures(&cleaned) {
        return captures[1].to_string();
    }

    cleaned
}

/// Character-safe truncation (byte slicing could split a UTF-8 sequence).
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

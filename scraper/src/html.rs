//! Small helpers shared by the page parsers.

use scraper::{ElementRef, Selector};

/// Parses a selector written in the source. Only ever called with literals.
pub fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

/// Visible text of an element, trimmed.
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Collapses every whitespace run into a single space.
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

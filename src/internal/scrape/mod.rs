//! HTML-to-domain-model scraping.
//!
//! The markup is treated as a versioned, fragile contract with the upstream
//! site: selectors match exactly, and anything that does not match is
//! skipped rather than guessed at.

pub mod comments;
pub mod posts;
pub mod votes;

use scraper::ElementRef;

/// Concatenated, trimmed text content of an element.
pub(crate) fn collect_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// The next sibling that is an element, skipping text nodes.
pub(crate) fn next_element_sibling<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

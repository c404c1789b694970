// src/extract/mod.rs
// =============================================================================
// This module extracts anchor targets from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// The contract is deliberately dumb: return the raw href values exactly as
// the page author wrote them, in document order, unfiltered. Deciding what
// a href *means* (relative? javascript? junk?) is the normalizer's job.
// =============================================================================

use scraper::{Html, Selector};

// Extracts every anchor href from an HTML body.
//
// html5ever is error-tolerant, so a malformed document degrades into
// "whatever could be parsed" — worst case an empty Vec, never a fault.
// Anchors without an href attribute are ignored.
//
// Example:
//   body = "<a href='/docs'>Docs</a><a href='http://x.com'>X</a>"
//   result = ["/docs", "http://x.com"]
pub fn extract_links(body: &str) -> Vec<String> {
    let document = Html::parse_document(body);

    // Selector::parse can only fail on an invalid selector; ours is a
    // constant known to be valid, so unwrap() is a programmer-error check
    let selector = Selector::parse("a[href]").unwrap();

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

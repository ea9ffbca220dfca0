// src/checker/html.rs
// =============================================================================
// This module extracts links from HTML attributes.
//
// Documentation sources mix raw HTML into Markdown (and some pages are pure
// HTML), so we don't parse a DOM here. Instead we scan the raw text for any
// link-bearing attribute followed by a quoted value:
//
//   <a href="/docs/setup">       -> "/docs/setup"
//   <img src='diagram.png'>      -> "diagram.png"
//   <form action="/search">      -> "/search"
//
// Working on raw text means we know exactly where each value sits in the
// file, which the reporter needs to point at the right line.
//
// Rust concepts:
// - LazyLock: compile the regex once, on first use
// - Iterators: captures_iter() walks every match in order
// =============================================================================

use regex::Regex;
use std::sync::LazyLock;

use super::link::LinkOccurrence;

// The attribute names that can carry a URL
static ATTRIBUTE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:href|src|action|data|poster|cite|profile|background|ping|formaction)\s*=\s*["']([^"']+)["']"#,
    )
    .expect("attribute link pattern is valid")
});

// Extracts every attribute link from the document, in document order
//
// Example:
//   text = r#"<a href="/docs">Docs</a>"#
//   result = [LinkOccurrence { raw: "/docs", span: 9..14 }]
pub fn extract_html_links(text: &str) -> Vec<LinkOccurrence> {
    ATTRIBUTE_LINK
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|value| LinkOccurrence::new(value.as_str(), value.range()))
        .collect()
}

// src/checker/markdown.rs
// =============================================================================
// This module extracts inline links from Markdown text.
//
// We look for the `[label](target)` form and keep the target. A target may
// carry a title after the URL:
//
//   [Setup](/docs/setup "Setting things up")
//
// The title is kept here and stripped later by the classifier, so the span
// still covers exactly what the author wrote between the parentheses.
//
// Reference-style links (`[label][ref]`) and autolinks (`<https://...>`)
// are not picked up.
// =============================================================================

use regex::Regex;
use std::sync::LazyLock;

use super::link::LinkOccurrence;

static INLINE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("inline link pattern is valid")
});

// Extracts every inline link target from Markdown text, in document order
//
// Example input:
//   "Check out [Rust](https://www.rust-lang.org)!"
//
// Example output:
//   [LinkOccurrence { raw: "https://www.rust-lang.org", span: 17..42 }]
pub fn extract_markdown_links(markdown: &str) -> Vec<LinkOccurrence> {
    INLINE_LINK
        .captures_iter(markdown)
        .filter_map(|caps| caps.get(2))
        .map(|target| LinkOccurrence::new(target.as_str(), target.range()))
        .collect()
}

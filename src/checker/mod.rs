// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - link: the data types passed between the stages
// - html: extracts links from HTML attributes
// - markdown: extracts links from Markdown `[label](target)` syntax
// - classify: cleans a link and expands it to an absolute URL
// - http: probes URLs concurrently and judges the answers
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod classify;
mod html;
mod http;
mod link;
mod markdown;

pub use classify::resolve;
pub use http::{Outcome, Prober, Verdict, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS};
pub use link::{LinkKind, LinkOccurrence, ResolvedTarget};

use html::extract_html_links;
use markdown::extract_markdown_links;

// Extracts every link occurrence from a document
//
// Attribute links come first, then inline Markdown links. Within each group
// the links are in document order.
pub fn extract_links(text: &str) -> Vec<LinkOccurrence> {
    let mut links = extract_html_links(text);
    links.extend(extract_markdown_links(text));
    links
}

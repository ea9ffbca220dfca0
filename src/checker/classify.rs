// src/checker/classify.rs
// =============================================================================
// This module turns a raw link string into the absolute URL we will probe.
//
// Steps:
// 1. Clean: drop a trailing quoted title (`/a/b "title"` -> `/a/b`)
// 2. Classify by the leading characters
// 3. Expand against the document's base URL
//
//   kind          example        checked URL
//   -----------   ------------   ---------------------------------
//   Absolute      https://x.io   https://x.io
//   RootRelative  /docs/x        <base>/docs/x
//   Fragment      #usage         <base>/<page path>/#usage
//   Other         img.png        <base>/img.png
//
// Nothing is URL-encoded or validated. A malformed URL simply fails its
// probe and is reported as broken.
// =============================================================================

use regex::Regex;
use std::sync::LazyLock;

use super::link::{LinkKind, LinkOccurrence, ResolvedTarget};

// A URL with no whitespace, optionally followed by a "quoted title"
static TITLED_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\S+)(?:\s+"[^"]*")?$"#).expect("titled url pattern is valid")
});

/// Strips link-title metadata from a raw link string.
///
/// Strings that don't fit the `url "title"` shape come back unchanged.
pub fn clean_url(raw: &str) -> &str {
    TITLED_URL
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map_or(raw, |url| url.as_str())
}

pub fn classify(cleaned: &str) -> LinkKind {
    if cleaned.starts_with("http://") || cleaned.starts_with("https://") {
        LinkKind::Absolute
    } else if cleaned.starts_with('/') {
        LinkKind::RootRelative
    } else if cleaned.starts_with('#') {
        LinkKind::Fragment
    } else {
        LinkKind::Other
    }
}

// Resolves one occurrence against the run's base URL
//
// Parameters:
//   occurrence: the link as found in the document
//   base_url: the canonical root for this document (no trailing slash)
//   page_path: the document's own path under the content root, e.g. "en/page"
pub fn resolve(occurrence: LinkOccurrence, base_url: &str, page_path: &str) -> ResolvedTarget {
    let cleaned = clean_url(&occurrence.raw);
    let kind = classify(cleaned);

    let url = match kind {
        LinkKind::Absolute => cleaned.to_string(),
        LinkKind::RootRelative => format!("{base_url}{cleaned}"),
        LinkKind::Fragment => format!("{base_url}/{page_path}/{cleaned}"),
        LinkKind::Other => format!("{base_url}/{cleaned}"),
    };

    ResolvedTarget {
        occurrence,
        kind,
        url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://docs.example.com/p";

    fn resolve_raw(raw: &str) -> ResolvedTarget {
        resolve(LinkOccurrence::new(raw, 0..raw.len()), BASE, "en/page")
    }

    #[test]
    fn test_clean_strips_title() {
        assert_eq!(clean_url(r#"/a/b "title""#), "/a/b");
        assert_eq!(clean_url(r#"/a/b   """#), "/a/b");
    }

    #[test]
    fn test_clean_leaves_plain_urls() {
        assert_eq!(clean_url("https://x.com"), "https://x.com");
        // whitespace not followed by a quoted title is not a title
        assert_eq!(clean_url("/a/b icon"), "/a/b icon");
    }

    #[test]
    fn test_absolute_is_unchanged() {
        let target = resolve_raw("https://a.com/x");
        assert_eq!(target.kind, LinkKind::Absolute);
        assert_eq!(target.url, "https://a.com/x");

        let target = resolve_raw("http://a.com/x \"A\"");
        assert_eq!(target.kind, LinkKind::Absolute);
        assert_eq!(target.url, "http://a.com/x");
    }

    #[test]
    fn test_root_relative_appends_to_base() {
        let target = resolve_raw("/docs/x");
        assert_eq!(target.kind, LinkKind::RootRelative);
        assert_eq!(target.url, "https://docs.example.com/p/docs/x");
    }

    #[test]
    fn test_fragment_uses_page_path() {
        let target = resolve_raw("#section");
        assert_eq!(target.kind, LinkKind::Fragment);
        assert_eq!(target.url, "https://docs.example.com/p/en/page/#section");
    }

    #[test]
    fn test_other_is_joined_with_slash() {
        let target = resolve_raw("img.png");
        assert_eq!(target.kind, LinkKind::Other);
        assert_eq!(target.url, "https://docs.example.com/p/img.png");

        // schemes we don't know are still just "other"
        let target = resolve_raw("mailto:someone@example.com");
        assert_eq!(target.kind, LinkKind::Other);
        assert_eq!(target.url, "https://docs.example.com/p/mailto:someone@example.com");
    }

    #[test]
    fn test_resolve_keeps_raw_occurrence() {
        let raw = r#"/docs/x "Docs""#;
        let target = resolve_raw(raw);
        assert_eq!(target.occurrence.raw, raw);
        assert_eq!(target.url, "https://docs.example.com/p/docs/x");
    }
}

// src/checker/link.rs
// =============================================================================
// The values that flow through one check-run:
//
//   LinkOccurrence  ->  ResolvedTarget  ->  Verdict (see http.rs)
//
// An occurrence is one regex match in the document. Two identical links on
// different lines are two occurrences, and each gets its own verdict.
// =============================================================================

use serde::Serialize;
use std::ops::Range;

/// One link string found in the document, with the byte range of the
/// captured text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOccurrence {
    pub raw: String,
    pub span: Range<usize>,
}

impl LinkOccurrence {
    pub fn new(raw: &str, span: Range<usize>) -> Self {
        Self {
            raw: raw.to_string(),
            span,
        }
    }
}

/// How a cleaned link string relates to the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// `http://...` or `https://...`, checked as written
    Absolute,
    /// `/path`, appended to the base URL
    RootRelative,
    /// `#anchor` on the same page
    Fragment,
    /// anything else, joined to the base URL with a `/`
    Other,
}

/// An occurrence paired with the absolute URL that will be probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub occurrence: LinkOccurrence,
    pub kind: LinkKind,
    pub url: String,
}

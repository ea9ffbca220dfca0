// src/report.rs
// =============================================================================
// Turns verdicts into diagnostics anchored to the source text.
//
// Each verdict carries the byte span of its link, captured when the link was
// extracted. Here we convert that span to line:column positions so the output
// can point at the exact spot (`page.md:12:9`), and build a message of the
// form `<checked URL> - <detail>`.
//
// The DiagnosticStore keeps the latest diagnostics per document. Starting a
// new run for a document wipes whatever the previous run left behind.
// =============================================================================

use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::checker::{LinkKind, Outcome, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Information,
}

/// A 1-based line and column (columns count characters, not bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRange {
    pub start: Position,
    pub end: Position,
    pub bytes: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub range: SourceRange,
    /// The link as written in the document
    pub link: String,
    pub kind: LinkKind,
    pub checked_url: String,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub broken: usize,
    pub working: usize,
}

impl Summary {
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let broken = diagnostics.iter().filter(|d| d.is_error()).count();
        Self {
            total: diagnostics.len(),
            broken,
            working: diagnostics.len() - broken,
        }
    }

    pub fn add(&mut self, other: Summary) {
        self.total += other.total;
        self.broken += other.broken;
        self.working += other.working;
    }

    /// One-line summary, e.g. `Checked 12 URLs, found 1 broken and 11 working.`
    pub fn headline(&self) -> String {
        format!(
            "Checked {} URLs, found {} broken and {} working.",
            self.total, self.broken, self.working
        )
    }
}

// Maps byte offsets to line/column positions
//
// We record where every line starts once, then binary-search it for each
// offset instead of rescanning the text per link.
struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = self
            .text
            .get(line_start..offset)
            .map_or(0, |prefix| prefix.chars().count());

        Position {
            line,
            column: column + 1,
        }
    }

    fn range(&self, bytes: Range<usize>) -> SourceRange {
        SourceRange {
            start: self.position(bytes.start),
            end: self.position(bytes.end),
            bytes,
        }
    }
}

/// Builds one diagnostic per verdict, ordered by position in the document.
pub fn diagnose(text: &str, verdicts: &[Verdict]) -> Vec<Diagnostic> {
    let index = LineIndex::new(text);

    let mut diagnostics: Vec<Diagnostic> = verdicts
        .iter()
        .map(|verdict| {
            let severity = match verdict.outcome {
                Outcome::Broken => Severity::Error,
                Outcome::Working => Severity::Information,
            };

            Diagnostic {
                severity,
                message: format!("{} - {}", verdict.checked_url(), verdict.detail),
                range: index.range(verdict.target.occurrence.span.clone()),
                link: verdict.target.occurrence.raw.clone(),
                kind: verdict.target.kind,
                checked_url: verdict.checked_url().to_string(),
            }
        })
        .collect();

    // probes finish in any order; sort so output is stable between runs
    diagnostics.sort_by(|a, b| {
        (a.range.bytes.start, a.range.bytes.end, &a.checked_url)
            .cmp(&(b.range.bytes.start, b.range.bytes.end, &b.checked_url))
    });
    diagnostics
}

/// Latest diagnostics per document, keyed by path.
#[derive(Debug, Default)]
pub struct DiagnosticStore {
    documents: BTreeMap<PathBuf, Vec<Diagnostic>>,
}

impl DiagnosticStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the previous run's diagnostics for `document`.
    pub fn begin_run(&mut self, document: &Path) {
        self.documents.remove(document);
    }

    pub fn publish(&mut self, document: &Path, diagnostics: Vec<Diagnostic>) {
        self.documents.insert(document.to_path_buf(), diagnostics);
    }

    pub fn get(&self, document: &Path) -> Option<&[Diagnostic]> {
        self.documents.get(document).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[Diagnostic])> {
        self.documents
            .iter()
            .map(|(path, diagnostics)| (path.as_path(), diagnostics.as_slice()))
    }

    pub fn summary(&self) -> Summary {
        let mut total = Summary::default();
        for (_, diagnostics) in self.iter() {
            total.add(Summary::from_diagnostics(diagnostics));
        }
        total
    }
}

// src/check.rs
// =============================================================================
// One check-run: a single document, start to finish.
//
//   read text -> extract links -> resolve base URL -> classify links
//             -> probe (bounded) -> diagnostics -> publish to the store
//
// Setup failures (wrong file type, no config, unknown product) stop the run
// before any link is probed. After that nothing can fail the run: a link
// that can't be reached is just a Broken verdict.
// =============================================================================

use std::path::{Path, PathBuf};

use crate::checker::{self, LinkOccurrence, Prober, ResolvedTarget, Verdict};
use crate::error::CheckError;
use crate::report::{self, DiagnosticStore, Summary};
use crate::site::SiteResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Html,
    Markdown,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "html" | "htm" => Some(Self::Html),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }
}

/// What one finished run produced.
#[derive(Debug)]
pub struct CheckRun {
    pub document: PathBuf,
    pub base_url: String,
    pub verdicts: Vec<Verdict>,
    pub summary: Summary,
}

// Checks every link in `document` and publishes the diagnostics to `store`
//
// The store entry for this document is cleared first, so a failed run
// leaves no stale diagnostics behind.
pub async fn check_document(
    document: &Path,
    resolver: &SiteResolver<'_>,
    prober: &Prober,
    store: &mut DiagnosticStore,
) -> Result<CheckRun, CheckError> {
    store.begin_run(document);

    let kind = DocumentKind::from_path(document).ok_or_else(|| CheckError::UnsupportedDocument {
        path: document.to_path_buf(),
    })?;

    let text = tokio::fs::read_to_string(document)
        .await
        .map_err(|source| CheckError::ReadDocument {
            path: document.to_path_buf(),
            source,
        })?;

    let occurrences: Vec<LinkOccurrence> = checker::extract_links(&text);
    tracing::info!(
        ?kind,
        "{} links found in {}",
        occurrences.len(),
        document.display()
    );

    let site = resolver.resolve(document).await?;

    let targets: Vec<ResolvedTarget> = occurrences
        .into_iter()
        .map(|occurrence| checker::resolve(occurrence, &site.base_url, &site.page_path))
        .collect();

    tracing::info!("Checking {} URLs... Please wait.", targets.len());
    let verdicts = prober.check_all(targets).await;

    let diagnostics = report::diagnose(&text, &verdicts);
    let summary = Summary::from_diagnostics(&diagnostics);
    store.publish(document, diagnostics);

    Ok(CheckRun {
        document: document.to_path_buf(),
        base_url: site.base_url,
        verdicts,
        summary,
    })
}

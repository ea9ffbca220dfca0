// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (to stderr, so JSON on stdout stays clean)
// 3. Load the product table once
// 4. Dispatch to the appropriate subcommand handler
// 5. Exit with proper code (0 = success, 1 = broken links, 2 = error)
// =============================================================================

mod check; // src/check.rs - one check-run per document
mod checker; // src/checker/ - link extraction, classification and probing
mod cli; // src/cli.rs - command-line parsing
mod error; // src/error.rs - setup failures
mod report; // src/report.rs - diagnostics and summaries
mod site; // src/site/ - where a document is published

use anyhow::Result;
use clap::Parser; // Parser trait enables the parse() method
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use checker::{LinkKind, Prober};
use cli::{Cli, Commands};
use report::{Diagnostic, DiagnosticStore, Severity, Summary};
use site::{ProductMap, SiteResolver};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Ok(2) = at least one document could not be checked
//   Err = unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let products = match &cli.products {
        Some(path) => ProductMap::load(path)?,
        None => ProductMap::builtin(),
    };
    if products.is_empty() {
        tracing::warn!("product table is empty, no document can be resolved");
    }
    tracing::debug!("Loaded {} products", products.len());

    let timeout = Duration::from_secs(cli.timeout);

    match cli.command {
        Commands::Check {
            files,
            json,
            concurrency,
        } => {
            let prober = Prober::new(timeout, concurrency)?;
            let resolver = SiteResolver::new(prober.client(), &products, &cli.doc_host);
            handle_check(&files, json, &resolver, &prober).await
        }
        Commands::BaseUrl { file } => {
            let client = reqwest::Client::builder().timeout(timeout).build()?;
            let resolver = SiteResolver::new(&client, &products, &cli.doc_host);
            handle_base_url(&file, &resolver).await
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    // RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,doclink_checker={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// Handles the 'check' subcommand
//
// Each file is its own check-run. A file that can't be checked (wrong type,
// no config, unknown product) is reported and skipped; the others still run.
async fn handle_check(
    files: &[PathBuf],
    json: bool,
    resolver: &SiteResolver<'_>,
    prober: &Prober,
) -> Result<i32> {
    let mut store = DiagnosticStore::new();
    let mut checked = Vec::new();
    let mut failed = false;

    for document in document_paths(files).await? {
        match check::check_document(&document, resolver, prober, &mut store).await {
            Ok(run) => {
                for verdict in &run.verdicts {
                    tracing::debug!(ok = verdict.is_ok(), "{} - {}", verdict.checked_url(), verdict.detail);
                }
                tracing::info!("{}: {}", run.document.display(), run.summary.headline());
                checked.push((run.document, run.base_url));
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                failed = true;
            }
        }
    }

    print_results(&checked, &store, json)?;

    if failed {
        Ok(2)
    } else if store.summary().broken > 0 {
        Ok(1) // Exit code 1 = broken links found
    } else {
        Ok(0) // Exit code 0 = all good
    }
}

// Handles the 'base-url' subcommand
async fn handle_base_url(file: &Path, resolver: &SiteResolver<'_>) -> Result<i32> {
    let document = document_path(file).await?;
    let site = resolver.resolve(&document).await?;

    println!("{}", site.base_url);
    tracing::info!("page path: {}", site.page_path);
    Ok(0)
}

// The canonical path of a document, so `a/../page.md` and `page.md` are the
// same document. Missing files keep their absolute path and fail in the run.
async fn document_path(file: &Path) -> Result<PathBuf> {
    match tokio::fs::canonicalize(file).await {
        Ok(path) => Ok(path),
        Err(_) => Ok(std::path::absolute(file)?),
    }
}

// Each document is checked and printed once, in the order first given
async fn document_paths(files: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for file in files {
        let document = document_path(file).await?;
        if !documents.contains(&document) {
            documents.push(document);
        }
    }
    Ok(documents)
}

#[derive(Serialize)]
struct DocumentOutput<'a> {
    document: &'a Path,
    base_url: &'a str,
    summary: Summary,
    diagnostics: &'a [Diagnostic],
}

#[derive(Serialize)]
struct Output<'a> {
    documents: Vec<DocumentOutput<'a>>,
    summary: Summary,
}

// Prints the results either as a table or JSON
fn print_results(checked: &[(PathBuf, String)], store: &DiagnosticStore, json: bool) -> Result<()> {
    let documents: Vec<DocumentOutput> = checked
        .iter()
        .filter_map(|(document, base_url)| {
            let diagnostics = store.get(document)?;
            Some(DocumentOutput {
                document,
                base_url,
                summary: Summary::from_diagnostics(diagnostics),
                diagnostics,
            })
        })
        .collect();

    if json {
        let output = Output {
            documents,
            summary: store.summary(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for document in &documents {
            print_table(document);
        }
        print_summary(store.summary());
    }
    Ok(())
}

// Prints one document's diagnostics as a human-readable table
fn print_table(output: &DocumentOutput) {
    println!("📄 {}", output.document.display());
    println!("   base URL: {}", output.base_url);
    println!();
    println!("{:<10} {:<12} {:<15} {}", "LOCATION", "STATUS", "KIND", "MESSAGE");
    println!("{}", "=".repeat(100));

    for diagnostic in output.diagnostics {
        let start = diagnostic.range.start;
        let location = format!("{}:{}", start.line, start.column);

        println!(
            "{:<10} {:<12} {:<15} {}",
            location,
            format_severity(diagnostic.severity),
            format_kind(diagnostic.kind),
            diagnostic.message
        );
    }

    println!();
    println!("{}", output.summary.headline());
    println!();
}

fn print_summary(summary: Summary) {
    println!("📊 Summary:");
    println!("   ✅ Working: {}", summary.working);
    println!("   ❌ Broken: {}", summary.broken);
    println!("   📋 Total: {}", summary.total);
}

fn format_severity(severity: Severity) -> &'static str {
    match severity {
        Severity::Information => "✅ OK",
        Severity::Error => "❌ BROKEN",
    }
}

fn format_kind(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::Absolute => "absolute",
        LinkKind::RootRelative => "root-relative",
        LinkKind::Fragment => "fragment",
        LinkKind::Other => "relative",
    }
}

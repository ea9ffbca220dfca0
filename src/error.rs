// src/error.rs
// =============================================================================
// Errors that abort a whole check-run.
//
// Everything here happens BEFORE any link is probed: a run that cannot work
// out its base URL has nothing to check. Failures of individual links are
// not errors at all - they become Broken verdicts (see checker/http.rs).
// =============================================================================

use std::path::PathBuf;

/// A setup failure for one check-run.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The file is neither HTML nor Markdown.
    #[error("{}: only HTML and Markdown files can be checked", path.display())]
    UnsupportedDocument { path: PathBuf },

    /// The document itself could not be read.
    #[error("could not read {}: {source}", path.display())]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No `config/config.toml` above the document.
    #[error("config file not found for {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("could not read config file {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path has no `content` segment with a folder in front of it.
    #[error("could not extract product folder from {}", path.display())]
    NoProductFolder { path: PathBuf },

    #[error("no matching product found for folder: {0}")]
    UnknownProduct(String),

    /// A `--products` table that does not parse.
    #[error("invalid product table {}: {message}", path.display())]
    ProductTable { path: PathBuf, message: String },
}

// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::checker::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS};
use crate::site::DEFAULT_DOC_HOST;

#[derive(Parser, Debug)]
#[command(
    name = "doclink-checker",
    version,
    about = "Check the links in documentation sources against the published docs site",
    long_about = "doclink-checker reads HTML and Markdown sources from a docs site, works out \
                  where each page is published, and probes every link it finds. Broken links \
                  are reported with the line and column they appear on."
)]
pub struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Docs site that relative links are resolved against
    #[arg(long, global = true, default_value = DEFAULT_DOC_HOST)]
    pub doc_host: String,

    /// TOML file replacing the built-in product table
    ///
    /// Format: a [products] table mapping folder names to product paths,
    /// e.g. geneos = "docs/geneos/current"
    #[arg(long, global = true)]
    pub products: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check every link in one or more HTML/Markdown files
    ///
    /// Example: doclink-checker check geneos/content/en/install.md
    Check {
        /// Files to check (each file is its own run)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,

        /// Maximum number of links probed at the same time
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,
    },

    /// Print the base URL a file's relative links resolve against
    ///
    /// Example: doclink-checker base-url geneos/content/en/install.md
    BaseUrl {
        file: PathBuf,
    },
}

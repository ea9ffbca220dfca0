// src/site/location.rs
// =============================================================================
// Works out where a document sits inside its docs site.
//
// Every site follows the same layout:
//
//   .../<product folder>/content/<page path>.md
//
// - The product folder (the segment right before `content`) tells us which
//   product the page belongs to.
// - The page path (everything after `content`, extension dropped) is the
//   page's own path on the published site, which same-page `#anchor` links
//   need.
// =============================================================================

use std::path::{Component, Path};

/// The folder name that separates site structure from document structure.
pub const CONTENT_MARKER: &str = "content";

const MARKUP_EXTENSIONS: &[&str] = &["md", "markdown", "html", "htm"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocation {
    pub product_folder: String,
    pub page_path: String,
}

impl DocumentLocation {
    /// Returns `None` when the path has no `content` segment, or when
    /// `content` is the very first segment.
    pub fn from_path(path: &Path) -> Option<Self> {
        let segments = segments(path);

        let first_marker = segments.iter().position(|s| s == CONTENT_MARKER)?;
        let product_folder = segments.get(first_marker.checked_sub(1)?)?.clone();

        // `content` may appear again deeper down; the page path starts after
        // the last one
        let last_marker = segments.iter().rposition(|s| s == CONTENT_MARKER)?;
        let page_path = page_path(&segments[last_marker + 1..]);

        Some(Self {
            product_folder,
            page_path,
        })
    }
}

// Folds `.` and `..` lexically, so `content/en/../page.md` is `content/page.md`
fn segments(path: &Path) -> Vec<String> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_string_lossy().into_owned()),
            Component::ParentDir => {
                segments.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    segments
}

// Joins the segments below the content root, dropping the markup extension
// from the file name
fn page_path(segments: &[String]) -> String {
    let mut parts: Vec<&str> = segments.iter().map(String::as_str).collect();

    if let Some(last) = parts.last_mut() {
        let file = Path::new(*last);
        let is_markup = file
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| MARKUP_EXTENSIONS.contains(&ext));

        if is_markup {
            if let Some(stem) = file.file_stem().and_then(|stem| stem.to_str()) {
                *last = stem;
            }
        }
    }

    parts.join("/")
}

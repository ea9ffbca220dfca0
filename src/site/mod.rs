// src/site/mod.rs
// =============================================================================
// This module knows how a documentation source tree maps onto the published
// docs site.
//
// Submodules:
// - locate: finds the build config above a document
// - location: product folder and page path from the document's path
// - products: the folder -> product table
// - version: asks the live site which version is current
// - resolver: puts it all together into one base URL
// =============================================================================

mod locate;
mod location;
mod products;
mod resolver;
mod version;

pub use products::ProductMap;
pub use resolver::{SiteResolver, DEFAULT_DOC_HOST};

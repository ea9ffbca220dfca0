// src/site/products.rs
// =============================================================================
// The product mapping table: folder name -> product path on the docs site.
//
// A table ships inside the binary (products.toml next to this file). Users
// can swap in their own with `--products FILE`, using the same format:
//
//   [products]
//   geneos = "docs/geneos/current"
//
// The table is loaded once at startup and handed to the resolver; it never
// changes afterwards.
// =============================================================================

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::CheckError;

const BUILTIN_TABLE: &str = include_str!("products.toml");

#[derive(Debug, Deserialize)]
struct ProductTable {
    products: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductMap {
    products: BTreeMap<String, String>,
}

impl ProductMap {
    pub fn builtin() -> Self {
        // The embedded table is covered by a test, so this can't fail at runtime
        Self::from_toml(BUILTIN_TABLE).expect("built-in product table is valid TOML")
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        let table: ProductTable = toml::from_str(text)?;
        Ok(Self {
            products: table.products,
        })
    }

    pub fn load(path: &Path) -> Result<Self, CheckError> {
        let text = std::fs::read_to_string(path).map_err(|e| CheckError::ProductTable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_toml(&text).map_err(|e| CheckError::ProductTable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn lookup(&self, folder: &str) -> Option<&str> {
        self.products.get(folder).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

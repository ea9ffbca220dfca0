// src/site/resolver.rs
// =============================================================================
// Computes the base URL for one document: the published root that every
// relative link in it is resolved against.
//
// How it works:
// 1. Find the nearest config/config.toml above the document
// 2. Read the product folder off the path and look it up in the product map
// 3. Scan the config text for its `publishDir` line
//      "public/opsview/cloud"   -> the Opsview Cloud docs, a fixed URL
//      "public/<name>/7_0_1"    -> version 7.0.1 of the product
//      nothing                  -> the product's unversioned URL
// 4. For a version, ask the docs site whether it is the live one:
//      live     -> https://<host>/docs/geneos/current
//      pinned   -> https://<host>/docs/geneos/7.0.1
//
// Only the first two steps can fail the run. A failed version check falls
// back to the pinned URL.
// =============================================================================

use regex::Regex;
use reqwest::Client;
use std::path::Path;
use std::sync::LazyLock;

use super::locate::find_config_file;
use super::location::DocumentLocation;
use super::products::ProductMap;
use super::version::is_live_version;
use crate::error::CheckError;

pub const DEFAULT_DOC_HOST: &str = "https://docs.itrsgroup.com";

// Checked before the general pattern: Opsview Cloud isn't versioned like
// the other products
static CLOUD_PUBLISH_DIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"publishDir\s*=\s*"public/opsview/cloud""#).expect("cloud pattern is valid")
});

static VERSIONED_PUBLISH_DIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"publishDir\s*=\s*"public/([^/]+)/([\d_]+)""#)
        .expect("publishDir pattern is valid")
});

const CLOUD_PATH: &str = "docs/opsview/cloud";

/// What the build config says about where the site is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishDir {
    /// `publishDir = "public/opsview/cloud"`
    OpsviewCloud,
    /// `publishDir = "public/<product>/<version>"`, version with dots
    Versioned { product: String, version: String },
    /// No publishDir line we recognise
    Unversioned,
}

pub fn parse_publish_dir(config_text: &str) -> PublishDir {
    if CLOUD_PUBLISH_DIR.is_match(config_text) {
        return PublishDir::OpsviewCloud;
    }

    match VERSIONED_PUBLISH_DIR.captures(config_text) {
        Some(caps) => PublishDir::Versioned {
            product: caps[1].to_string(),
            version: caps[2].replace('_', "."),
        },
        None => PublishDir::Unversioned,
    }
}

/// A product path with a `current` alias (`docs/geneos/current`) has
/// pinned versions next to it. Anything else is only published once.
pub fn is_versioned_product(product_name: &str) -> bool {
    product_name.contains("current")
}

// Builds the base URL once we know everything
//
// Example (doc_host = "https://docs.itrsgroup.com"):
//   "widgetcurrent", Versioned 7.0.1, live     -> ".../widgetcurrent"
//   "widgetcurrent", Versioned 7.0.1, not live -> ".../widget7.0.1"
pub fn base_url(doc_host: &str, product_name: &str, publish: &PublishDir, is_live: bool) -> String {
    match publish {
        PublishDir::OpsviewCloud => format!("{doc_host}/{CLOUD_PATH}"),
        PublishDir::Unversioned => format!("{doc_host}/{product_name}"),
        PublishDir::Versioned { .. } if is_live => format!("{doc_host}/{product_name}"),
        PublishDir::Versioned { version, .. } => {
            format!("{doc_host}/{}{version}", product_name.replace("current", ""))
        }
    }
}

/// Where one document lives on the published site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteContext {
    pub base_url: String,
    pub page_path: String,
}

/// Resolves documents to their [`SiteContext`]. Holds no per-run state.
#[derive(Debug, Clone)]
pub struct SiteResolver<'a> {
    client: &'a Client,
    products: &'a ProductMap,
    doc_host: &'a str,
}

impl<'a> SiteResolver<'a> {
    pub fn new(client: &'a Client, products: &'a ProductMap, doc_host: &'a str) -> Self {
        Self {
            client,
            products,
            doc_host: doc_host.trim_end_matches('/'),
        }
    }

    pub async fn resolve(&self, document: &Path) -> Result<SiteContext, CheckError> {
        let config = find_config_file(document).ok_or_else(|| CheckError::ConfigNotFound {
            path: document.to_path_buf(),
        })?;

        let location =
            DocumentLocation::from_path(document).ok_or_else(|| CheckError::NoProductFolder {
                path: document.to_path_buf(),
            })?;

        let product_name = self
            .products
            .lookup(&location.product_folder)
            .ok_or_else(|| CheckError::UnknownProduct(location.product_folder.clone()))?;

        let config_text =
            tokio::fs::read_to_string(&config)
                .await
                .map_err(|source| CheckError::ReadConfig {
                    path: config.clone(),
                    source,
                })?;

        let publish = parse_publish_dir(&config_text);
        tracing::debug!(?publish, product = product_name, "parsed build config");

        let is_live = match &publish {
            PublishDir::Versioned { product, version } if is_versioned_product(product_name) => {
                tracing::debug!(published_as = %product, "checking live version");
                is_live_version(self.client, self.doc_host, product_name, version).await
            }
            // nothing pinned to fall back to
            PublishDir::Versioned { .. } => true,
            PublishDir::OpsviewCloud | PublishDir::Unversioned => false,
        };

        let base_url = base_url(self.doc_host, product_name, &publish, is_live);
        tracing::info!(base_url = %base_url, "resolved base URL");

        Ok(SiteContext {
            base_url,
            page_path: location.page_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn products() -> ProductMap {
        ProductMap::from_toml(
            "[products]\nwidget = \"widgetcurrent\"\nplain = \"docs/plain\"\nopsview = \"docs/opsview/current\"\n",
        )
        .unwrap()
    }

    // Lays out <tmp>/<folder>/config/config.toml and a page under content/
    fn site(config: &str, folder: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(folder);
        fs::create_dir_all(root.join("config")).unwrap();
        fs::create_dir_all(root.join("content/en")).unwrap();
        fs::write(root.join("config/config.toml"), config).unwrap();
        let page = root.join("content/en/page.md");
        fs::write(&page, "# Page").unwrap();
        (dir, page)
    }

    #[test]
    fn test_parse_cloud_wins() {
        let config = r#"
            publishDir = "public/opsview/cloud"
            # stale line from a versioned build
            publishDir = "public/opsview/6_8_0"
        "#;
        assert_eq!(parse_publish_dir(config), PublishDir::OpsviewCloud);
    }

    #[test]
    fn test_parse_version() {
        let config = "baseURL = \"/\"\npublishDir   =  \"public/widgetcurrent/7_0_1\"\n";
        assert_eq!(
            parse_publish_dir(config),
            PublishDir::Versioned {
                product: "widgetcurrent".to_string(),
                version: "7.0.1".to_string()
            }
        );
    }

    #[test]
    fn test_parse_nothing() {
        assert_eq!(parse_publish_dir("title = \"Docs\""), PublishDir::Unversioned);
        // a non-numeric version isn't a version
        assert_eq!(
            parse_publish_dir("publishDir = \"public/widget/latest\""),
            PublishDir::Unversioned
        );
    }

    #[test]
    fn test_base_urls() {
        let versioned = PublishDir::Versioned {
            product: "widgetcurrent".to_string(),
            version: "7.0.1".to_string(),
        };

        assert_eq!(
            base_url(DEFAULT_DOC_HOST, "opsview", &PublishDir::OpsviewCloud, false),
            "https://docs.itrsgroup.com/docs/opsview/cloud"
        );
        assert_eq!(
            base_url(DEFAULT_DOC_HOST, "widgetcurrent", &versioned, true),
            "https://docs.itrsgroup.com/widgetcurrent"
        );
        assert_eq!(
            base_url(DEFAULT_DOC_HOST, "widgetcurrent", &versioned, false),
            "https://docs.itrsgroup.com/widget7.0.1"
        );
        assert_eq!(
            base_url(DEFAULT_DOC_HOST, "docs/plain", &PublishDir::Unversioned, false),
            "https://docs.itrsgroup.com/docs/plain"
        );
    }

    #[tokio::test]
    async fn test_resolve_cloud_needs_no_network() {
        let (_dir, page) = site(
            "title = \"x\"\npublishDir = \"public/opsview/cloud\"\n",
            "opsview",
        );
        let client = Client::new();
        let products = products();
        let resolver = SiteResolver::new(&client, &products, DEFAULT_DOC_HOST);

        let context = resolver.resolve(&page).await.unwrap();
        assert_eq!(context.base_url, "https://docs.itrsgroup.com/docs/opsview/cloud");
        assert_eq!(context.page_path, "en/page");
    }

    #[tokio::test]
    async fn test_resolve_live_and_pinned_versions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/widgetcurrent"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<div class="version-picker" data-product="widget"></div>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/versions/widget.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{ "path": "/widget7.0.1/" }])),
            )
            .mount(&server)
            .await;

        let client = Client::new();
        let products = products();
        let host = server.uri();
        let resolver = SiteResolver::new(&client, &products, &host);

        let (_live_dir, live_page) = site("publishDir = \"public/widgetcurrent/7_0_1\"", "widget");
        let context = resolver.resolve(&live_page).await.unwrap();
        assert_eq!(context.base_url, format!("{host}/widgetcurrent"));

        let (_old_dir, old_page) = site("publishDir = \"public/widgetcurrent/6_9_0\"", "widget");
        let context = resolver.resolve(&old_page).await.unwrap();
        assert_eq!(context.base_url, format!("{host}/widget6.9.0"));
    }

    #[tokio::test]
    async fn test_resolve_version_check_failure_pins() {
        // nothing mounted: every request gets a 404
        let server = MockServer::start().await;
        let client = Client::new();
        let products = products();
        let host = server.uri();
        let resolver = SiteResolver::new(&client, &products, &host);

        let (_dir, page) = site("publishDir = \"public/widgetcurrent/7_0_1\"", "widget");
        let context = resolver.resolve(&page).await.unwrap();
        assert_eq!(context.base_url, format!("{host}/widget7.0.1"));
    }

    #[tokio::test]
    async fn test_resolve_unversioned_product_skips_check() {
        let (_dir, page) = site("publishDir = \"public/plain/2_0_0\"", "plain");
        let client = Client::new();
        let products = products();
        let resolver = SiteResolver::new(&client, &products, "https://docs.itrsgroup.com/");

        let context = resolver.resolve(&page).await.unwrap();
        assert_eq!(context.base_url, "https://docs.itrsgroup.com/docs/plain");
    }

    #[tokio::test]
    async fn test_resolve_setup_failures() {
        let client = Client::new();
        let products = products();
        let resolver = SiteResolver::new(&client, &products, DEFAULT_DOC_HOST);

        let (_dir, page) = site("", "unmapped");
        assert!(matches!(
            resolver.resolve(&page).await,
            Err(CheckError::UnknownProduct(folder)) if folder == "unmapped"
        ));

        // config present, but no content folder in the path
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        fs::write(dir.path().join("config/config.toml"), "").unwrap();
        let page = dir.path().join("page.md");
        fs::write(&page, "").unwrap();
        assert!(matches!(
            resolver.resolve(&page).await,
            Err(CheckError::NoProductFolder { .. })
        ));
    }
}

// src/site/version.rs
// =============================================================================
// Asks the live docs site whether a configured version is the one it serves
// by default.
//
// A versioned product is published twice:
//   https://<host>/docs/geneos/current   the live version (an alias)
//   https://<host>/docs/geneos/7.0.1     every version, pinned
//
// There are two ways to find out what `current` points at:
//
// 1. Redirect: the alias redirects to the pinned URL, so the version is
//    right there in the final URL.
// 2. Version picker: the page carries
//      <div class="version-picker" data-product="geneos">
//    and https://<host>/versions/geneos.json lists the versions as
//      [{ "path": "/docs/geneos/7.0.1/" }, ...]
//
// Any failure along the way means "not live". The caller then links to the
// pinned URL, which exists whether or not the version is current.
// =============================================================================

use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::sync::LazyLock;
use url::Url;

static VERSION_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+").expect("version pattern is valid"));

#[derive(Debug, Deserialize)]
struct VersionEntry {
    path: String,
}

#[derive(Debug, thiserror::Error)]
enum VersionCheckError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{url} answered {status}")]
    Status { url: String, status: u16 },

    #[error("no version picker on {0}")]
    NoVersionPicker(String),
}

/// Returns `true` when `configured` (e.g. `"7.0.1"`) is the version served
/// at `https://<doc_host>/<product_name>`.
pub async fn is_live_version(
    client: &Client,
    doc_host: &str,
    product_name: &str,
    configured: &str,
) -> bool {
    match check_live_version(client, doc_host, product_name, configured).await {
        Ok(live) => {
            tracing::info!(product = product_name, version = configured, live, "version check");
            live
        }
        Err(e) => {
            tracing::warn!(
                product = product_name,
                version = configured,
                "version check failed, using the pinned URL: {e}"
            );
            false
        }
    }
}

async fn check_live_version(
    client: &Client,
    doc_host: &str,
    product_name: &str,
    configured: &str,
) -> Result<bool, VersionCheckError> {
    let page_url = format!("{doc_host}/{product_name}");
    let response = fetch(client, &page_url).await?;

    if let Some(live) = redirected_version(&page_url, response.url()) {
        tracing::debug!(live = %live, "live version from redirect");
        return Ok(live == configured);
    }

    let body = response.text().await?;
    let picker_product =
        version_picker_product(&body).ok_or_else(|| VersionCheckError::NoVersionPicker(page_url))?;

    let listing_url = format!("{doc_host}/versions/{picker_product}.json");
    let entries: Vec<VersionEntry> = fetch(client, &listing_url).await?.json().await?;

    Ok(listing_has_version(&entries, configured))
}

async fn fetch(client: &Client, url: &str) -> Result<reqwest::Response, VersionCheckError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(VersionCheckError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    Ok(response)
}

// The version embedded in the URL we ended up at, if we were redirected
fn redirected_version(requested: &str, landed: &Url) -> Option<String> {
    let requested = Url::parse(requested).ok()?;
    if requested.path().trim_end_matches('/') == landed.path().trim_end_matches('/') {
        return None;
    }

    VERSION_NUMBER
        .find(landed.path())
        .map(|m| m.as_str().to_string())
}

// Reads `data-product` off the first `.version-picker` element
fn version_picker_product(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(".version-picker").ok()?;

    document
        .select(&selector)
        .next()?
        .value()
        .attr("data-product")
        .map(str::to_string)
}

fn listing_has_version(entries: &[VersionEntry], configured: &str) -> bool {
    entries.iter().any(|entry| {
        VERSION_NUMBER
            .find(&entry.path)
            .is_some_and(|m| m.as_str() == configured)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PICKER_PAGE: &str = r#"
        <html><body>
          <nav><div class="version-picker" data-product="widget"></div></nav>
        </body></html>
    "#;

    #[test]
    fn test_redirected_version() {
        let landed = Url::parse("https://docs.example.com/widget7.1.0/").unwrap();
        assert_eq!(
            redirected_version("https://docs.example.com/widgetcurrent", &landed),
            Some("7.1.0".to_string())
        );

        // no redirect, no version
        let landed = Url::parse("https://docs.example.com/widgetcurrent/").unwrap();
        assert_eq!(
            redirected_version("https://docs.example.com/widgetcurrent", &landed),
            None
        );
    }

    #[test]
    fn test_version_picker_product() {
        assert_eq!(version_picker_product(PICKER_PAGE), Some("widget".to_string()));
        assert_eq!(version_picker_product("<p>no picker</p>"), None);
        assert_eq!(
            version_picker_product(r#"<div class="version-picker"></div>"#),
            None
        );
    }

    #[test]
    fn test_listing_has_version() {
        let entries = vec![
            VersionEntry { path: "/widget7.0.1/".to_string() },
            VersionEntry { path: "/widget6.2.10/".to_string() },
            VersionEntry { path: "/widget/archive/".to_string() },
        ];
        assert!(listing_has_version(&entries, "7.0.1"));
        assert!(listing_has_version(&entries, "6.2.10"));
        assert!(!listing_has_version(&entries, "6.2.1"));
    }

    #[tokio::test]
    async fn test_live_through_version_picker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/widgetcurrent"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PICKER_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/versions/widget.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "path": "/widget7.0.1/" },
                { "path": "/widget6.2.0/" }
            ])))
            .mount(&server)
            .await;

        let client = Client::new();
        assert!(is_live_version(&client, &server.uri(), "widgetcurrent", "7.0.1").await);
        assert!(!is_live_version(&client, &server.uri(), "widgetcurrent", "5.0.0").await);
    }

    #[tokio::test]
    async fn test_live_through_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/widgetcurrent"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/widget7.1.0/", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/widget7.1.0/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = Client::new();
        assert!(is_live_version(&client, &server.uri(), "widgetcurrent", "7.1.0").await);
        assert!(!is_live_version(&client, &server.uri(), "widgetcurrent", "7.0.1").await);
    }

    #[tokio::test]
    async fn test_failures_mean_not_live() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/nopicker"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>hello</p>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/widgetcurrent"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PICKER_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/versions/widget.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = Client::new();
        // page missing entirely (404)
        assert!(!is_live_version(&client, &server.uri(), "gone", "1.0.0").await);
        // page without a version picker
        assert!(!is_live_version(&client, &server.uri(), "nopicker", "1.0.0").await);
        // listing that isn't JSON
        assert!(!is_live_version(&client, &server.uri(), "widgetcurrent", "7.0.1").await);
    }
}

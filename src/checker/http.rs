// src/checker/http.rs
// =============================================================================
// This module checks if URLs are alive by making HTTP requests.
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - Accepts any status code as an answer (a 404 is a response, not an error)
// - Turns each answer into a Working/Broken verdict
// - Runs checks concurrently with a hard ceiling on in-flight requests
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - Generics with closures: The pool doesn't care HOW a URL is probed
// - Streams: For processing many items concurrently
// =============================================================================

use futures::stream::{self, StreamExt}; // StreamExt gives us .buffer_unordered()
use reqwest::Client;
use std::error::Error as _;
use std::future::Future;
use std::time::Duration;

use super::link::ResolvedTarget;

/// Default number of probes allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Working,
    Broken,
}

/// The final answer for one link occurrence. Never changed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub target: ResolvedTarget,
    pub outcome: Outcome,
    pub detail: String,
}

impl Verdict {
    pub fn is_ok(&self) -> bool {
        self.outcome == Outcome::Working
    }

    pub fn checked_url(&self) -> &str {
        &self.target.url
    }
}

/// What came back from probing one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResponse {
    /// The server answered with this status code
    Status(u16),
    /// No usable answer: DNS, refused connection, TLS, timeout, bad URL...
    Failed(String),
}

// Turns a probe response into a verdict
//
// HTTP status codes:
// - 200-299: Working
// - 403, 404: Broken, the page is missing or locked away
// - anything else: Broken, with the code in the detail
pub fn judge(target: ResolvedTarget, response: ProbeResponse) -> Verdict {
    let (outcome, detail) = match response {
        ProbeResponse::Status(code @ (403 | 404)) => {
            (Outcome::Broken, format!("{code} Forbidden/Not Found"))
        }
        ProbeResponse::Status(code) if (200..300).contains(&code) => {
            (Outcome::Working, "Working".to_string())
        }
        ProbeResponse::Status(code) => (Outcome::Broken, format!("{code} Error")),
        ProbeResponse::Failed(message) => (Outcome::Broken, message),
    };

    Verdict {
        target,
        outcome,
        detail,
    }
}

// Probes every target with at most `limit` probes outstanding at a time
//
// Results come back in completion order, NOT input order.
//
// Parameters:
//   targets: the resolved links (one verdict will come back per target)
//   limit: the concurrency ceiling (0 is treated as 1)
//   probe: given a URL, produces a future that probes it
pub async fn probe_all<F, Fut>(targets: Vec<ResolvedTarget>, limit: usize, probe: F) -> Vec<Verdict>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = ProbeResponse>,
{
    let checks = targets.into_iter().map(|target| {
        let response = probe(target.url.clone());
        async move { judge(target, response.await) }
    });

    // buffer_unordered(N) only pulls the next check from the iterator once
    // fewer than N are running, so it is our admission controller
    stream::iter(checks)
        .buffer_unordered(limit.max(1))
        .collect()
        .await
}

/// Sends HEAD requests for resolved links through one shared client.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    concurrency: usize,
}

impl Prober {
    pub fn new(timeout: Duration, concurrency: usize) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5)) // Follow up to 5 redirects
            .build()?;

        Ok(Self {
            client,
            concurrency,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn check_all(&self, targets: Vec<ResolvedTarget>) -> Vec<Verdict> {
        probe_all(targets, self.concurrency, |url| {
            let client = self.client.clone(); // Client is an Arc inside, cheap to clone
            async move { head(&client, &url).await }
        })
        .await
    }
}

// Sends one HEAD request and reports whatever came back
async fn head(client: &Client, url: &str) -> ProbeResponse {
    match client.head(url).send().await {
        Ok(response) => ProbeResponse::Status(response.status().as_u16()),
        Err(e) => {
            tracing::debug!(url, error = %e, "probe failed");
            ProbeResponse::Failed(describe_error(&e))
        }
    }
}

// Builds the most useful message we can from a reqwest error
//
// A status attached to the error wins. Otherwise we walk the source chain,
// because the top-level message ("error sending request for url ...") hides
// the interesting part ("connection refused", "dns error", ...).
fn describe_error(error: &reqwest::Error) -> String {
    if let Some(status) = error.status() {
        return format!("Status: {}", status.as_u16());
    }

    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is probe_all generic over a closure?
//    - The pool logic (how many at once, collect everything) is separate
//      from the network logic (send a HEAD request)
//    - Tests pass a fake probe that sleeps and counts, no network needed
//
// 2. What is `code @ (403 | 404)`?
//    - A binding pattern: match either value AND name it `code`
//
// 3. What does .buffer_unordered(N) do?
//    - Runs up to N futures at once
//    - Yields each result as soon as it finishes (hence "unordered")
//
// 4. Why `limit.max(1)`?
//    - buffer_unordered(0) would never start anything
// -----------------------------------------------------------------------------

//! Recursive sitemap resolver
//!
//! Resolves a sitemap URL into the full set of page URLs it covers. A
//! fetched document may be a sitemap index (`<sitemap>` entries pointing at
//! further sitemaps), a leaf sitemap (`<url>` entries pointing at pages), or
//! defensively both. Child sitemaps are resolved recursively, each recursion
//! level fanning out through its own bounded pool of concurrent fetches.
//!
//! Failure semantics: only a failure fetching the *root* document fails the
//! resolution. A failing child sitemap is logged and contributes no URLs; it
//! never aborts its siblings or the parent. Malformed or unrecognizable XML
//! counts as "zero URLs found", not an error.
//!
//! A visited set shared across the whole resolution breaks cycles: a sitemap
//! indexing itself or an ancestor is skipped instead of recursing forever.

use crate::crawler::{Document, DocumentFormat, Fetcher};
use crate::ResolveError;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Concurrent child resolutions per recursion level
///
/// Each level opens its own pool, so in-flight fetches across a deep tree can
/// exceed this width. Accepted tradeoff for keeping the recursion simple.
const CHILD_POOL_WIDTH: usize = 10;

/// Resolves a root sitemap URL into its deduplicated set of page URLs
///
/// # Arguments
///
/// * `fetcher` - Shared HTTP session for all fetches in this resolution
/// * `root_url` - Absolute URL of the sitemap or sitemap index document
///
/// # Returns
///
/// * `Ok(HashSet<String>)` - Union of all leaf URLs found transitively;
///   empty when the document is not recognizable sitemap XML
/// * `Err(ResolveError)` - The root document could not be fetched
pub async fn resolve(fetcher: &Fetcher, root_url: &str) -> Result<HashSet<String>, ResolveError> {
    let visited = Arc::new(Mutex::new(HashSet::new()));
    visited.lock().unwrap().insert(root_url.trim().to_string());

    let text = fetcher
        .fetch_text(root_url)
        .await
        .map_err(|source| ResolveError::RootFetch {
            url: root_url.to_string(),
            source,
        })?;

    Ok(collect_urls(fetcher, root_url, text, visited).await)
}

/// Classifies one fetched document and gathers its URLs
///
/// Directly-found `<url><loc>` entries go straight into the result; every
/// `<sitemap><loc>` entry not seen before in this resolution is resolved
/// recursively and its URLs merged in.
async fn collect_urls(
    fetcher: &Fetcher,
    source_url: &str,
    text: String,
    visited: Arc<Mutex<HashSet<String>>>,
) -> HashSet<String> {
    let (child_sitemaps, mut urls) = classify(&text, source_url);

    if !child_sitemaps.is_empty() {
        // Skip children already visited in this resolution (cycle guard)
        let to_resolve: Vec<String> = {
            let mut seen = visited.lock().unwrap();
            child_sitemaps
                .into_iter()
                .filter(|child| seen.insert(child.clone()))
                .collect()
        };

        let mut results = stream::iter(
            to_resolve
                .into_iter()
                .map(|child| resolve_child(fetcher, child, Arc::clone(&visited))),
        )
        .buffer_unordered(CHILD_POOL_WIDTH);

        while let Some(child_urls) = results.next().await {
            urls.extend(child_urls);
        }
    }

    urls
}

/// Extracts child sitemap locations and page locations from sitemap XML
///
/// Synchronous on purpose: the parsed document must be dropped before any
/// await, and both element kinds are checked independently since a document
/// may carry either or both.
fn classify(text: &str, source_url: &str) -> (Vec<String>, HashSet<String>) {
    let mut document = Document::new(text.to_string(), DocumentFormat::Xml);

    let child_sitemaps: Vec<String> = document
        .xml_elements("sitemap")
        .iter()
        .filter_map(|element| element.child_text("loc"))
        .map(|loc| loc.trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect();

    let urls: HashSet<String> = document
        .xml_elements("url")
        .iter()
        .filter_map(|element| element.child_text("loc"))
        .map(|loc| loc.trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect();

    if !child_sitemaps.is_empty() {
        tracing::info!(
            "Sitemap index found at {}. Processing {} child sitemaps",
            source_url,
            child_sitemaps.len()
        );
    }
    if !urls.is_empty() {
        tracing::info!(
            "Standard sitemap found at {}. Processing {} URLs",
            source_url,
            urls.len()
        );
    }

    (child_sitemaps, urls)
}

/// Resolves one child sitemap, swallowing failures
///
/// Boxed because the recursion through [`collect_urls`] would otherwise make
/// the future type infinitely sized.
fn resolve_child<'a>(
    fetcher: &'a Fetcher,
    url: String,
    visited: Arc<Mutex<HashSet<String>>>,
) -> BoxFuture<'a, HashSet<String>> {
    async move {
        match fetcher.fetch_text(&url).await {
            Ok(text) => collect_urls(fetcher, &url, text, visited).await,
            Err(e) => {
                tracing::warn!("Failed to process child sitemap {}: {}", url, e);
                HashSet::new()
            }
        }
    }
    .boxed()
}

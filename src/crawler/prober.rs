//! Meta tag prober
//!
//! Answers two questions about one fetched HTML document: does a meta tag
//! with a given name exist, and what is its `content` attribute. The parsed
//! document is cached inside the prober, so scanning many tag names costs a
//! single parse.

use crate::crawler::{Document, DocumentFormat};
use std::collections::HashMap;

/// One unit of crawl work: a URL plus the named checks to perform on it
///
/// An empty check list is permitted and means "fetch only".
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    pub url: String,
    pub checks: Vec<String>,
}

impl CrawlTarget {
    pub fn new(url: impl Into<String>, checks: Vec<String>) -> Self {
        Self {
            url: url.into(),
            checks,
        }
    }
}

/// Outcome of a single named check against one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Whether a meta tag with the check's name exists
    Found(bool),

    /// The `content` attribute of the named meta tag, if any
    Content(Option<String>),

    /// The check could not be performed (e.g. the fetch failed)
    Error,
}

/// Mapping from check name to outcome; keys are the caller's check names
pub type TagCheckResult = HashMap<String, CheckOutcome>;

/// Probes one fetched HTML document for meta tags
#[derive(Debug)]
pub struct MetaProber {
    document: Document,
}

impl MetaProber {
    /// Wraps the fetched HTML text of one page
    pub fn new(html: String) -> Self {
        Self {
            document: Document::new(html, DocumentFormat::Html),
        }
    }

    /// Returns true iff a `<meta name="...">` tag with this name exists
    pub fn has_tag(&mut self, name: &str) -> bool {
        self.document.has_meta_tag(name)
    }

    /// Returns the `content` attribute of the first meta tag with this name
    ///
    /// `None` when the tag is missing or carries no `content` attribute.
    pub fn tag_content(&mut self, name: &str) -> Option<String> {
        self.document.meta_content(name)
    }

    /// Runs an existence check for every name in `checks`
    ///
    /// # Returns
    ///
    /// One [`CheckOutcome::Found`] entry per check name.
    pub fn scan(&mut self, checks: &[String]) -> TagCheckResult {
        checks
            .iter()
            .map(|name| (name.clone(), CheckOutcome::Found(self.has_tag(name))))
            .collect()
    }
}

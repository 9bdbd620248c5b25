//! Crawler module - fetching, parsing, probing, and sitemap resolution
//!
//! This module contains the network-facing core of tagsweep:
//! - HTTP fetching with a fixed per-request cooldown
//! - Lazily parsed HTML/XML documents
//! - Meta tag probing over one fetched page
//! - Recursive, concurrent sitemap resolution

pub mod document;
pub mod fetcher;
pub mod prober;
pub mod sitemap;

pub use document::{Document, DocumentFormat, XmlElement};
pub use fetcher::{build_http_client, Fetcher};
pub use prober::{CheckOutcome, CrawlTarget, MetaProber, TagCheckResult};
pub use sitemap::resolve;

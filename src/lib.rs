//! Tagsweep: a concurrent on-page SEO audit crawler
//!
//! This crate fetches batches of URLs concurrently, probes their meta tags,
//! resolves sitemap trees recursively, and aggregates the results into
//! tabular reports.

pub mod commands;
pub mod config;
pub mod crawler;
pub mod report;
pub mod runner;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tagsweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single HTTP fetch
///
/// Always recoverable at the caller level: one bad URL marks that task's
/// result as an error without aborting the batch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request failed for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },
}

/// Failure to resolve a sitemap
///
/// Only raised when the *root* sitemap document cannot be fetched. Failures
/// while resolving child sitemaps are logged and swallowed.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Failed to fetch root sitemap {url}: {source}")]
    RootFetch { url: String, source: FetchError },
}

/// Tabular input/output errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Column '{0}' has no values")]
    EmptyColumn(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for tagsweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for report operations
pub type ReportResult<T> = std::result::Result<T, ReportError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Document, DocumentFormat, Fetcher, MetaProber};
pub use runner::{run_all, LogProgress, ProgressObserver};

//! Configuration module for tagsweep
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. All settings have sensible defaults, so running without a config
//! file is fully supported.
//!
//! # Example
//!
//! ```no_run
//! use tagsweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tagsweep.toml")).unwrap();
//! println!("Worker pool width: {}", config.crawler.max_workers);
//! ```

use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::Path;

/// User agent presented on every request
///
/// A browser-like identifying header; many sites serve stripped-down pages
/// (or none at all) to obvious bot user agents, which would skew the audit.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for tagsweep
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Width of the worker pool for batch operations
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Cooldown after every request in milliseconds, applied on success and
    /// failure alike
    #[serde(rename = "cooldown-ms", default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    /// User agent string sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory where report files are written
    #[serde(rename = "results-dir", default = "default_results_dir")]
    pub results_dir: String,
}

fn default_max_workers() -> usize {
    10
}

fn default_request_timeout() -> u64 {
    10
}

fn default_cooldown_ms() -> u64 {
    1000
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_results_dir() -> String {
    "results".to_string()
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            request_timeout_secs: default_request_timeout(),
            cooldown_ms: default_cooldown_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
        }
    }
}

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Validates a configuration
///
/// Rejects settings that would make the crawler either do nothing
/// (zero workers) or hammer servers (zero timeout).
fn validate(config: &Config) -> ConfigResult<()> {
    if config.crawler.max_workers == 0 {
        return Err(ConfigError::Validation(
            "crawler.max-workers must be at least 1".to_string(),
        ));
    }

    if config.crawler.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "crawler.request-timeout-secs must be at least 1".to_string(),
        ));
    }

    if config.crawler.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler.user-agent must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.crawler.max_workers, 10);
        assert_eq!(config.crawler.request_timeout_secs, 10);
        assert_eq!(config.crawler.cooldown_ms, 1000);
        assert_eq!(config.output.results_dir, "results");
        assert!(config.crawler.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[crawler]\nmax-workers = 4\ncooldown-ms = 50").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.crawler.max_workers, 4);
        assert_eq!(config.crawler.cooldown_ms, 50);
        // Unspecified fields keep their defaults
        assert_eq!(config.crawler.request_timeout_secs, 10);
        assert_eq!(config.output.results_dir, "results");
    }

    #[test]
    fn test_load_empty_config() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.crawler.max_workers, 10);
    }

    #[test]
    fn test_reject_zero_workers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[crawler]\nmax-workers = 0").unwrap();

        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_reject_blank_user_agent() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[crawler]\nuser-agent = \"  \"").unwrap();

        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_config(Path::new("/nonexistent/tagsweep.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}

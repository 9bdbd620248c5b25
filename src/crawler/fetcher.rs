//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the audit crawler, including:
//! - Building HTTP clients with the configured user agent
//! - GET requests to fetch page or sitemap content
//! - Unconditional post-request cooldown to throttle aggregate request rate
//! - Error classification into status vs. transport failures
//!
//! No retries happen at this layer; retry policy, if any, belongs to callers.

use crate::config::CrawlerConfig;
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;

/// Shared HTTP session used by every worker in a batch
///
/// Wraps a [`reqwest::Client`] (which is internally reference-counted, so
/// cloning a `Fetcher` is cheap and shares the connection pool) together
/// with the fixed cooldown applied after each request.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    cooldown: Duration,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.request_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

impl Fetcher {
    /// Creates a fetcher from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            cooldown: Duration::from_millis(config.cooldown_ms),
        })
    }

    /// Creates a fetcher from an existing client and cooldown
    ///
    /// Useful in tests where the cooldown would dominate the runtime.
    pub fn from_parts(client: Client, cooldown: Duration) -> Self {
        Self { client, cooldown }
    }

    /// Fetches the body of `url` as text
    ///
    /// Issues a single GET with the client's fixed timeout, then sleeps for
    /// the configured cooldown whether or not the request succeeded. The
    /// cooldown throttles the aggregate request rate of a worker pool
    /// independent of how many requests fail.
    ///
    /// # Arguments
    ///
    /// * `url` - A well-formed absolute URL
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The full response body
    /// * `Err(FetchError)` - Non-success HTTP status or transport failure
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let result = self.get_text(url).await;

        if let Err(ref e) = result {
            tracing::error!("Failed to access URL {}: {}", url, e);
        }

        // Cooldown applies regardless of outcome
        sleep(self.cooldown).await;

        result
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

//! Fetch collaborator
//!
//! This module defines how the crawl driver obtains resource bodies:
//! - The `Fetch` trait the driver is written against
//! - The default HTTP implementation on top of reqwest
//! - A blanket implementation so plain closures can stand in for a fetcher

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::Client;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The resource body was retrieved
    Success {
        /// Raw response body
        body: Vec<u8>,
    },

    /// The resource could not be retrieved; the URL is abandoned
    Failed {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    pub fn success(body: impl Into<Vec<u8>>) -> Self {
        Self::Success { body: body.into() }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }
}

/// Maps a canonical URL to its body
///
/// The driver awaits one fetch at a time; implementations don't need to be
/// reentrant beyond `Send + Sync`.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult;
}

#[async_trait]
impl<F> Fetch for F
where
    F: Fn(&str) -> FetchResult + Send + Sync,
{
    async fn fetch(&self, url: &str) -> FetchResult {
        self(url)
    }
}

/// Default fetcher performing a plain GET
///
/// Certificate validation is disabled so legacy and self-signed sites can be
/// mirrored. Transport errors and non-2xx statuses are failures.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return FetchResult::failed(describe_error(&e)),
        };

        let status = response.status();
        if !status.is_success() {
            return FetchResult::failed(format!("HTTP {}", status.as_u16()));
        }

        match response.bytes().await {
            Ok(body) => FetchResult::success(body.to_vec()),
            Err(e) => FetchResult::failed(describe_error(&e)),
        }
    }
}

/// Builds the HTTP client used by [`HttpFetcher`]
///
/// # Example
///
/// ```no_run
/// use site_mirror::config::UserAgentConfig;
/// use site_mirror::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "SiteMirror".to_string(),
///     crawler_version: "1.0".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent_string())
        .danger_accept_invalid_certs(true)
        .gzip(true)
        .brotli(true)
        .build()
}

fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    }
}

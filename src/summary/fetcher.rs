// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP content fetching with user-agent rotation, retries and timeouts
//!
//! Many sites reject default HTTP clients or fail transiently. The fetcher
//! walks a fixed list of browser user agents and gives each one a bounded
//! number of attempts before moving on. The first non-empty 2xx body wins.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use super::config::FetchConfig;

/// Content fetch error types
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// Request timed out
    #[error("Timeout fetching: {0}")]
    Timeout(String),
    /// Transport-level HTTP error
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// HTTP non-success status
    #[error("HTTP {0} for: {1}")]
    HttpStatus(u16, String),
    /// 2xx with nothing in the body
    #[error("Empty response body from: {0}")]
    EmptyBody(String),
    /// URL is malformed, not http(s), or points at a private host
    #[error("Unsafe URL blocked: {0}")]
    UnsafeUrl(String),
    /// Every user agent and attempt failed
    #[error("All {attempts} fetch attempts failed for {url}: {}", .messages.join("; "))]
    Exhausted {
        url: String,
        status: Option<u16>,
        attempts: usize,
        messages: Vec<String>,
    },
}

impl FetchError {
    /// HTTP status carried by this failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus(code, _) => Some(*code),
            Self::Exhausted { status, .. } => *status,
            _ => None,
        }
    }
}

/// Source of raw page HTML
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_content(&self, url: &str) -> Result<String, FetchError>;
}

/// Content fetcher backed by `reqwest`
pub struct ContentFetcher {
    client: Client,
    config: FetchConfig,
}

impl ContentFetcher {
    /// Create a new content fetcher
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::HttpError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Fetch raw HTML, trying each user agent up to `retries` times
    pub async fn fetch_with_retries(&self, url: &str, retries: u32) -> Result<String, FetchError> {
        let is_http = Url::parse(url)
            .map(|u| ["http", "https"].contains(&u.scheme()))
            .unwrap_or(false);
        if !is_http || (!self.config.allow_private_hosts && !Self::is_safe_url(url)) {
            return Err(FetchError::UnsafeUrl(url.to_string()));
        }

        let retries = retries.max(1) as usize;
        let total = retries * self.config.user_agents.len();
        let mut messages = Vec::with_capacity(total);
        let mut last_status = None;
        let mut attempt_no = 0;

        for (ua_index, user_agent) in self.config.user_agents.iter().enumerate() {
            for attempt in 1..=retries {
                attempt_no += 1;
                debug!(
                    "Fetching {} (user agent {}, attempt {}/{})",
                    url, ua_index, attempt, retries
                );

                match self.fetch_once(url, user_agent).await {
                    Ok(body) => {
                        info!(
                            "Fetched {} bytes from {} after {} attempt(s)",
                            body.len(),
                            url,
                            attempt_no
                        );
                        return Ok(body);
                    }
                    Err(e) => {
                        warn!(
                            "Fetch attempt {} for {} failed (user agent {}): {}",
                            attempt_no, url, ua_index, e
                        );
                        if let Some(status) = e.status() {
                            last_status = Some(status);
                        }
                        messages.push(e.to_string());
                    }
                }

                if attempt_no < total {
                    tokio::time::sleep(self.config.retry_delay()).await;
                }
            }
        }

        warn!("All {} fetch attempts exhausted for {}", attempt_no, url);
        Err(FetchError::Exhausted {
            url: url.to_string(),
            status: last_status,
            attempts: attempt_no,
            messages,
        })
    }

    async fn fetch_once(&self, url: &str, user_agent: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(url.to_string())
                } else {
                    FetchError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16(), url.to_string()));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::HttpError(e.to_string())
            }
        })?;

        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody(url.to_string()));
        }

        Ok(body)
    }

    /// Check if URL is safe to fetch (http/https, not localhost/private IP)
    pub fn is_safe_url(url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(_) => return false,
        };

        if !["http", "https"].contains(&parsed.scheme()) {
            return false;
        }

        match parsed.host() {
            Some(url::Host::Domain(domain)) => {
                let domain = domain.to_lowercase();
                domain != "localhost" && !domain.ends_with(".localhost")
            }
            Some(url::Host::Ipv4(ip)) => {
                !(ip.is_loopback()
                    || ip.is_private()
                    || ip.is_link_local()
                    || ip.is_unspecified()
                    || ip.is_broadcast())
            }
            Some(url::Host::Ipv6(ip)) => !(ip.is_loopback() || ip.is_unspecified()),
            None => false,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl PageFetcher for ContentFetcher {
    async fn fetch_content(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_with_retries(url, self.config.retries).await
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the summarization pipeline
//!
//! Defines settings for page fetching, text extraction and the hosted
//! language model.

use std::env;
use std::time::Duration;

/// Browser identities tried in order by the content fetcher
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Mobile/15E148 Safari/604.1",
];

pub const DEFAULT_SUMMARIZER_ENDPOINT: &str = "https://api.together.xyz/v1/chat/completions";
pub const DEFAULT_SUMMARIZER_MODEL: &str = "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo-128K";

/// Configuration for fetching and extracting article content
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Attempts per user agent (default: 3)
    pub retries: u32,
    /// Timeout per request in seconds (default: 10)
    pub timeout_secs: u64,
    /// Delay between failed attempts in milliseconds (default: 1000)
    pub retry_delay_ms: u64,
    /// User agents, tried in order
    pub user_agents: Vec<String>,
    /// Maximum characters of extracted text handed to the model (default: 2000)
    pub max_chars: usize,
    /// Minimum characters of extracted text worth summarizing (default: 100)
    pub min_chars: usize,
    /// Permit loopback and private network hosts (default: false)
    pub allow_private_hosts: bool,
}

impl FetchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            retries: env::var("FETCH_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retries),
            timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            retry_delay_ms: env::var("FETCH_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retry_delay_ms),
            user_agents: defaults.user_agents,
            max_chars: env::var("EXTRACT_MAX_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_chars),
            min_chars: env::var("EXTRACT_MIN_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_chars),
            allow_private_hosts: env::var("FETCH_ALLOW_PRIVATE_HOSTS")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.retries == 0 {
            return Err("retries must be at least 1".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be at least 1".to_string());
        }
        if self.user_agents.is_empty() {
            return Err("at least one user agent is required".to_string());
        }
        if self.max_chars < self.min_chars {
            return Err("max_chars must not be below min_chars".to_string());
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            timeout_secs: 10,
            retry_delay_ms: 1000,
            user_agents: DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
            max_chars: 2000,
            min_chars: 100,
            allow_private_hosts: false,
        }
    }
}

/// Configuration for the hosted language model
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// Bearer credential (TOGETHER_API_KEY)
    pub api_key: Option<String>,
    /// Chat completion endpoint
    pub endpoint: String,
    /// Model identifier
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    /// Requests per minute allowed towards the provider (default: 30)
    pub rate_limit_per_minute: u32,
}

impl SummarizerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("TOGETHER_API_KEY").ok().filter(|k| !k.is_empty()),
            endpoint: env::var("SUMMARIZER_ENDPOINT").unwrap_or(defaults.endpoint),
            model: env::var("SUMMARIZER_MODEL").unwrap_or(defaults.model),
            max_tokens: env::var("SUMMARIZER_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_tokens),
            temperature: env::var("SUMMARIZER_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.temperature),
            top_p: env::var("SUMMARIZER_TOP_P")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.top_p),
            rate_limit_per_minute: env::var("SUMMARIZER_RATE_LIMIT_PER_MINUTE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_limit_per_minute),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_tokens == 0 {
            return Err("max_tokens must be at least 1".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be between 0 and 2".to_string());
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err("top_p must be between 0 and 1".to_string());
        }
        if self.rate_limit_per_minute == 0 {
            return Err("Rate limit must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_SUMMARIZER_ENDPOINT.to_string(),
            model: DEFAULT_SUMMARIZER_MODEL.to_string(),
            max_tokens: 200,
            temperature: 0.3,
            top_p: 0.7,
            rate_limit_per_minute: 30,
        }
    }
}

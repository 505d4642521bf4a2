// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::env;
use std::time::Duration;

pub const DEFAULT_HN_API_BASE: &str = "https://hacker-news.firebaseio.com/v0";

/// Configuration for the upstream story source
#[derive(Debug, Clone)]
pub struct HnConfig {
    pub api_base: String,
    /// How long the max item id stays fresh (default: 300 seconds)
    pub max_item_ttl_secs: u64,
    /// Top-level comments fetched per story (default: 10)
    pub comment_limit: usize,
    /// Parallel item requests when searching (default: 16)
    pub fetch_concurrency: usize,
    pub timeout_secs: u64,
}

impl HnConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base: env::var("HN_API_BASE").unwrap_or(defaults.api_base),
            max_item_ttl_secs: env::var("HN_MAX_ITEM_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_item_ttl_secs),
            comment_limit: env::var("HN_COMMENT_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.comment_limit),
            fetch_concurrency: env::var("HN_FETCH_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_concurrency),
            timeout_secs: defaults.timeout_secs,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(format!("HN_API_BASE must be an http(s) URL: {}", self.api_base));
        }
        if self.fetch_concurrency == 0 {
            return Err("fetch_concurrency must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn max_item_ttl(&self) -> Duration {
        Duration::from_secs(self.max_item_ttl_secs)
    }
}

impl Default for HnConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_HN_API_BASE.to_string(),
            max_item_ttl_secs: 300,
            comment_limit: 10,
            fetch_concurrency: 16,
            timeout_secs: 10,
        }
    }
}

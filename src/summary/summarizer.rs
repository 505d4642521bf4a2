// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hosted language model client for article summaries
//!
//! Speaks the OpenAI-compatible chat completion protocol (Together AI by
//! default). The provider is treated as a black box: one system instruction,
//! one user message carrying the excerpt, a short output budget.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::config::SummarizerConfig;

/// Returned in place of an empty model answer
pub const FALLBACK_SUMMARY: &str = "Failed to generate summary";

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that summarizes text content concisely and accurately.";

/// Errors reported by the model provider
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SummarizerError {
    /// HTTP 429 from the provider, or the local limiter refused the call
    #[error("Rate limited by summarizer")]
    RateLimited { retry_after_secs: Option<u64> },

    /// HTTP 401 from the provider, or no credential configured
    #[error("Invalid summarizer credential: {0}")]
    InvalidCredential(String),

    /// Anything else: transport errors, 5xx, unparsable bodies
    #[error("Summarizer request failed: {0}")]
    Failed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize a plain-text excerpt
    async fn summarize(&self, excerpt: &str) -> Result<String, SummarizerError>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// First choice's content, trimmed, or the fallback string
    pub fn summary_text(&self) -> String {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_SUMMARY.to_string())
    }
}

/// Build the chat completion request for an excerpt
pub fn build_request(config: &SummarizerConfig, excerpt: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: format!("Please summarize the following text:\n\n{}", excerpt),
            },
        ],
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        top_p: config.top_p,
    }
}

/// Chat-completion summarizer for Together AI and compatible providers
pub struct ChatCompletionSummarizer {
    client: Client,
    config: SummarizerConfig,
}

impl ChatCompletionSummarizer {
    pub fn new(config: SummarizerConfig) -> Self {
        info!(
            "Summarizer configured: endpoint={}, model={}",
            config.endpoint, config.model
        );
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn classify_status(status: StatusCode, body: String) -> SummarizerError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => SummarizerError::RateLimited {
                retry_after_secs: None,
            },
            StatusCode::UNAUTHORIZED => SummarizerError::InvalidCredential(body),
            other => SummarizerError::Failed(format!("HTTP {}: {}", other.as_u16(), body)),
        }
    }
}

#[async_trait]
impl Summarizer for ChatCompletionSummarizer {
    async fn summarize(&self, excerpt: &str) -> Result<String, SummarizerError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            SummarizerError::InvalidCredential("TOGETHER_API_KEY is not set".to_string())
        })?;

        let request = build_request(&self.config, excerpt);
        let start = Instant::now();
        debug!("Requesting summary for {} chars", excerpt.len());

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizerError::Failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            warn!("Summarizer returned HTTP {}", status.as_u16());
            return Err(match Self::classify_status(status, body) {
                SummarizerError::RateLimited { .. } => SummarizerError::RateLimited {
                    retry_after_secs: retry_after,
                },
                other => other,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| SummarizerError::Failed(format!("invalid response body: {}", e)))?;

        let summary = completion.summary_text();
        info!(
            "Summary generated in {}ms ({} chars)",
            start.elapsed().as_millis(),
            summary.len()
        );
        Ok(summary)
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Summary record and the pipeline error taxonomy

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::fetcher::FetchError;
use super::summarizer::SummarizerError;
use crate::storage::StorageError;

/// A generated summary for one story
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorySummary {
    pub story_id: u64,
    pub summary: String,
    /// Epoch milliseconds at which the summary was stored
    pub timestamp: i64,
}

impl StorySummary {
    pub fn new(story_id: u64, summary: impl Into<String>, timestamp: i64) -> Self {
        Self {
            story_id,
            summary: summary.into(),
            timestamp,
        }
    }

    /// `now - timestamp >= ttl` means the record is logically absent
    pub fn is_expired(&self, now_millis: i64, ttl_millis: i64) -> bool {
        now_millis - self.timestamp >= ttl_millis
    }

    /// Parse a stored record, rejecting anything that does not have the
    /// expected shape
    pub fn from_json(raw: &[u8]) -> Option<Self> {
        let record: StorySummary = serde_json::from_slice(raw).ok()?;
        if record.timestamp <= 0 {
            return None;
        }
        Some(record)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Classification of a failed content fetch by upstream status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    Blocked,
    NotFound,
    RateLimited,
    ServerError,
    Unknown,
}

impl FetchFailureKind {
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(401) | Some(403) => Self::Blocked,
            Some(404) => Self::NotFound,
            Some(429) => Self::RateLimited,
            Some(s) if (500..600).contains(&s) => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blocked => "blocked",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Unknown => "unknown",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::Blocked => "Access to this site is blocked",
            Self::NotFound => "The article could not be found",
            Self::RateLimited => "The site is rate limiting requests, try again later",
            Self::ServerError => "The site is having problems, try again later",
            Self::Unknown => "The article could not be fetched",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarizerFailureKind {
    RateLimited,
    InvalidCredential,
    Other,
}

impl SummarizerFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::InvalidCredential => "invalid_credential",
            Self::Other => "other",
        }
    }
}

/// Errors surfaced by the summarization orchestrator
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SummaryError {
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// Not http(s), unparsable, or a private host
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to fetch {url}: {}", .kind.message())]
    FetchFailed {
        kind: FetchFailureKind,
        status: Option<u16>,
        url: String,
    },

    #[error("Insufficient content: {length} characters extracted, {min} required")]
    InsufficientContent { length: usize, min: usize },

    #[error("Summarizer failed: {message}")]
    SummarizerFailed {
        kind: SummarizerFailureKind,
        message: String,
    },

    #[error("Storage failed: {0}")]
    StorageFailed(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl SummaryError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingParameter(_) | Self::InvalidUrl(_) => 400,
            Self::FetchFailed { status, .. } => match status {
                Some(s @ (401 | 403 | 404 | 429)) => *s,
                Some(s) if (500..600).contains(s) => *s,
                _ => 503,
            },
            Self::InsufficientContent { .. } => 422,
            Self::SummarizerFailed { kind, .. } => match kind {
                SummarizerFailureKind::RateLimited => 429,
                SummarizerFailureKind::InvalidCredential => 401,
                SummarizerFailureKind::Other => 502,
            },
            Self::StorageFailed(_) => 500,
            Self::Unknown(_) => 500,
        }
    }

    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingParameter(_) => "missing_parameter",
            Self::InvalidUrl(_) => "invalid_url",
            Self::FetchFailed { .. } => "fetch_failed",
            Self::InsufficientContent { .. } => "insufficient_content",
            Self::SummarizerFailed { .. } => "summarizer_failed",
            Self::StorageFailed(_) => "storage_failed",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Message safe to show in place of the summary
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingParameter(name) => format!("Missing required parameter: {}", name),
            Self::InvalidUrl(_) => "The story URL cannot be fetched".to_string(),
            Self::FetchFailed { kind, .. } => kind.message().to_string(),
            Self::InsufficientContent { .. } => {
                "Not enough readable content on the page to summarize".to_string()
            }
            Self::SummarizerFailed { kind, .. } => match kind {
                SummarizerFailureKind::RateLimited => {
                    "The summarization service is busy, try again later".to_string()
                }
                SummarizerFailureKind::InvalidCredential => {
                    "The summarization service credential is invalid".to_string()
                }
                SummarizerFailureKind::Other => "Failed to generate summary".to_string(),
            },
            Self::StorageFailed(_) => "Failed to access the summary store".to_string(),
            Self::Unknown(_) => "An unexpected error occurred".to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::FetchFailed { kind, .. } => matches!(
                kind,
                FetchFailureKind::RateLimited | FetchFailureKind::ServerError
            ),
            Self::SummarizerFailed { kind, .. } => *kind == SummarizerFailureKind::RateLimited,
            Self::StorageFailed(_) | Self::Unknown(_) => true,
            Self::MissingParameter(_)
            | Self::InvalidUrl(_)
            | Self::InsufficientContent { .. } => false,
        }
    }
}

impl From<FetchError> for SummaryError {
    fn from(err: FetchError) -> Self {
        let url = match &err {
            FetchError::UnsafeUrl(u) => return Self::InvalidUrl(u.clone()),
            FetchError::Timeout(u) | FetchError::HttpStatus(_, u) | FetchError::EmptyBody(u) => {
                u.clone()
            }
            FetchError::Exhausted { url, .. } => url.clone(),
            FetchError::HttpError(_) => String::new(),
        };
        let status = err.status();
        Self::FetchFailed {
            kind: FetchFailureKind::from_status(status),
            status,
            url,
        }
    }
}

impl From<SummarizerError> for SummaryError {
    fn from(err: SummarizerError) -> Self {
        let kind = match &err {
            SummarizerError::RateLimited { .. } => SummarizerFailureKind::RateLimited,
            SummarizerError::InvalidCredential(_) => SummarizerFailureKind::InvalidCredential,
            SummarizerError::Failed(_) => SummarizerFailureKind::Other,
        };
        Self::SummarizerFailed {
            kind,
            message: err.to_string(),
        }
    }
}

impl From<StorageError> for SummaryError {
    fn from(err: StorageError) -> Self {
        Self::StorageFailed(err.to_string())
    }
}

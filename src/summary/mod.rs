// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Article summarization pipeline
//!
//! Fetches a story's linked page, reduces it to a plain-text excerpt and asks
//! a hosted language model for a short synopsis, caching the result in both
//! summary tiers.

pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod rate_limiter;
pub mod service;
pub mod summarizer;
pub mod types;

pub use config::{FetchConfig, SummarizerConfig};
pub use extractor::extract_text;
pub use fetcher::{ContentFetcher, FetchError, PageFetcher};
pub use rate_limiter::SummarizerRateLimiter;
pub use service::SummaryService;
pub use summarizer::{ChatCompletionSummarizer, Summarizer, SummarizerError, FALLBACK_SUMMARY};
pub use types::{FetchFailureKind, StorySummary, SummarizerFailureKind, SummaryError};

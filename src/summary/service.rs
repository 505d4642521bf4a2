// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Summarization orchestrator
//!
//! `get_or_create_summary` checks the client tier, then the server tier, and
//! only on a double miss runs fetch, extract and summarize before writing the
//! result through to both tiers. Concurrent calls for the same story share a
//! single pipeline run.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::config::FetchConfig;
use super::extractor::extract_text;
use super::fetcher::PageFetcher;
use super::rate_limiter::SummarizerRateLimiter;
use super::summarizer::Summarizer;
use super::types::{StorySummary, SummaryError};
use crate::storage::{run_blocking, ClientSummaryCache, ServerSummaryCache, StorageError};

type SharedSummary = Shared<BoxFuture<'static, Result<String, SummaryError>>>;

#[derive(Clone)]
struct Pipeline {
    fetcher: Arc<dyn PageFetcher>,
    summarizer: Arc<dyn Summarizer>,
    rate_limiter: Option<Arc<SummarizerRateLimiter>>,
    client_cache: Arc<ClientSummaryCache>,
    server_cache: Arc<ServerSummaryCache>,
    max_chars: usize,
    min_chars: usize,
}

pub struct SummaryService {
    pipeline: Arc<Pipeline>,
    in_flight: Arc<Mutex<HashMap<u64, SharedSummary>>>,
}

impl SummaryService {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        summarizer: Arc<dyn Summarizer>,
        client_cache: Arc<ClientSummaryCache>,
        server_cache: Arc<ServerSummaryCache>,
    ) -> Self {
        let defaults = FetchConfig::default();
        Self {
            pipeline: Arc::new(Pipeline {
                fetcher,
                summarizer,
                rate_limiter: None,
                client_cache,
                server_cache,
                max_chars: defaults.max_chars,
                min_chars: defaults.min_chars,
            }),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Excerpt cap and minimum meaningful length
    pub fn with_limits(mut self, max_chars: usize, min_chars: usize) -> Self {
        let pipeline = Arc::make_mut(&mut self.pipeline);
        pipeline.max_chars = max_chars;
        pipeline.min_chars = min_chars;
        self
    }

    pub fn with_rate_limiter(mut self, limiter: Arc<SummarizerRateLimiter>) -> Self {
        Arc::make_mut(&mut self.pipeline).rate_limiter = Some(limiter);
        self
    }

    pub fn client_cache(&self) -> &Arc<ClientSummaryCache> {
        &self.pipeline.client_cache
    }

    pub fn server_cache(&self) -> &Arc<ServerSummaryCache> {
        &self.pipeline.server_cache
    }

    /// Number of stories with a pipeline currently running
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Cached summary for `story_id`, or a freshly generated one
    pub async fn get_or_create_summary(
        &self,
        story_id: u64,
        url: &str,
    ) -> Result<String, SummaryError> {
        if story_id == 0 {
            return Err(SummaryError::MissingParameter("storyId".to_string()));
        }
        let url = url.trim();
        if url.is_empty() {
            return Err(SummaryError::MissingParameter("url".to_string()));
        }

        let shared = {
            let mut in_flight = self
                .in_flight
                .lock()
                .map_err(|_| SummaryError::Unknown("in-flight map poisoned".to_string()))?;

            if let Some(existing) = in_flight.get(&story_id) {
                debug!("Joining in-flight summarization for story {}", story_id);
                existing.clone()
            } else {
                let pipeline = self.pipeline.clone();
                let registry = self.in_flight.clone();
                let url = url.to_string();
                let run = async move {
                    let result = pipeline.run(story_id, &url).await;
                    if let Ok(mut map) = registry.lock() {
                        map.remove(&story_id);
                    }
                    result
                }
                .boxed()
                .shared();
                in_flight.insert(story_id, run.clone());
                run
            }
        };

        shared.await
    }
}

impl Pipeline {
    async fn store_locally(&self, record: StorySummary) -> Result<(), StorageError> {
        let client = self.client_cache.clone();
        run_blocking(move || client.store(&record)).await
    }

    async fn run(&self, story_id: u64, url: &str) -> Result<String, SummaryError> {
        if let Some(cached) = self.client_cache.get(story_id) {
            debug!("Client cache hit for story {}", story_id);
            return Ok(cached.summary);
        }

        match self.server_cache.get(story_id).await {
            Ok(Some(record)) => {
                debug!("Server cache hit for story {}", story_id);
                let summary = record.summary.clone();
                if let Err(e) = self.store_locally(record).await {
                    warn!("Failed to populate client cache for story {}: {}", story_id, e);
                }
                return Ok(summary);
            }
            Ok(None) => debug!("Cache miss for story {}", story_id),
            Err(e) => warn!(
                "Server cache read failed for story {}, treating as miss: {}",
                story_id, e
            ),
        }

        let start = Instant::now();
        let html = self.fetcher.fetch_content(url).await?;

        let text = extract_text(&html, self.max_chars);
        let length = text.chars().count();
        debug!("Extracted {} characters for story {}", length, story_id);
        if length < self.min_chars {
            warn!(
                "Insufficient content for story {}: {} < {} characters",
                story_id, length, self.min_chars
            );
            return Err(SummaryError::InsufficientContent {
                length,
                min: self.min_chars,
            });
        }

        if let Some(limiter) = &self.rate_limiter {
            limiter.check()?;
        }
        let summary = self.summarizer.summarize(&text).await?;

        match self.server_cache.put(story_id, &summary).await {
            Ok(record) => {
                if let Err(e) = self.store_locally(record).await {
                    warn!("Failed to cache summary locally for story {}: {}", story_id, e);
                }
            }
            Err(e) => {
                warn!("Failed to persist summary for story {}: {}", story_id, e);
                let client = self.client_cache.clone();
                let text = summary.clone();
                if let Err(e) = run_blocking(move || client.put(story_id, &text).map(|_| ())).await
                {
                    warn!("Failed to cache summary locally for story {}: {}", story_id, e);
                }
            }
        }

        info!(
            "Summarized story {} in {}ms",
            story_id,
            start.elapsed().as_millis()
        );
        Ok(summary)
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client for the public Hacker News Firebase API

use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use super::config::HnConfig;
use super::types::{Comment, Story, StoryPage, StoryType, User};
use crate::cache::TtlCache;

const MAX_ITEM_KEY: &str = "maxitem";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum HnError {
    #[error("HN request failed: {0}")]
    Network(String),
    #[error("HN returned HTTP {0}")]
    Status(u16),
    #[error("Invalid HN response: {0}")]
    Decode(String),
}

pub struct HnClient {
    client: Client,
    config: HnConfig,
    max_item_cache: Arc<TtlCache<&'static str, u64>>,
}

impl HnClient {
    pub fn new(config: HnConfig) -> Result<Self, HnError> {
        let cache = Arc::new(TtlCache::new(config.max_item_ttl(), 1));
        Self::with_cache(config, cache)
    }

    /// Use a caller-owned cache for the max item id
    pub fn with_cache(
        config: HnConfig,
        max_item_cache: Arc<TtlCache<&'static str, u64>>,
    ) -> Result<Self, HnError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HnError::Network(e.to_string()))?;

        Ok(Self {
            client,
            config: HnConfig {
                api_base: config.api_base.trim_end_matches('/').to_string(),
                ..config
            },
            max_item_cache,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, HnError> {
        let url = format!("{}/{}", self.config.api_base, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HnError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(HnError::Status(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| HnError::Decode(e.to_string()))
    }

    /// Highest item id; cached, falling back to the last known value and then
    /// to 0 when the upstream is unreachable
    pub async fn fetch_max_item(&self) -> u64 {
        if let Some(value) = self.max_item_cache.get(&MAX_ITEM_KEY) {
            return value;
        }

        match self.get_json::<u64>("maxitem.json").await {
            Ok(value) => {
                self.max_item_cache.insert(MAX_ITEM_KEY, value);
                value
            }
            Err(e) => {
                warn!("Error fetching max item: {}", e);
                self.max_item_cache.get_stale(&MAX_ITEM_KEY).unwrap_or(0)
            }
        }
    }

    pub async fn fetch_story_ids(
        &self,
        story_type: StoryType,
        limit: usize,
    ) -> Result<Vec<u64>, HnError> {
        let mut ids: Vec<u64> = self.get_json(&story_type.endpoint()).await?;
        ids.truncate(limit);
        Ok(ids)
    }

    /// `None` when the item does not exist
    pub async fn fetch_item(&self, id: u64) -> Result<Option<Story>, HnError> {
        self.get_json(&format!("item/{}.json", id)).await
    }

    pub async fn fetch_user(&self, username: &str) -> Result<Option<User>, HnError> {
        self.get_json(&format!("user/{}.json", username)).await
    }

    async fn fetch_comment(&self, id: u64) -> Result<Option<Comment>, HnError> {
        self.get_json(&format!("item/{}.json", id)).await
    }

    /// Fetch items concurrently, keeping input order and skipping failures
    async fn fetch_items(&self, ids: &[u64]) -> Vec<Story> {
        stream::iter(ids.iter().copied())
            .map(|id| async move { (id, self.fetch_item(id).await) })
            .buffered(self.config.fetch_concurrency.max(1))
            .filter_map(|(id, result)| async move {
                match result {
                    Ok(item) => item,
                    Err(e) => {
                        debug!("Skipping item {}: {}", id, e);
                        None
                    }
                }
            })
            .collect()
            .await
    }

    /// One page of stories of `story_type`, optionally filtered by a search
    /// query over title and author
    pub async fn get_stories(
        &self,
        page: usize,
        per_page: usize,
        query: Option<&str>,
        story_type: StoryType,
    ) -> Result<StoryPage, HnError> {
        let page = page.max(1);
        let per_page = per_page.max(1);

        let max_item = self.fetch_max_item().await;
        let ids = self
            .fetch_story_ids(story_type, story_type.fetch_limit(max_item))
            .await?;

        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let filtered: Vec<u64> = match query {
            Some(q) => {
                let needle = q.to_lowercase();
                self.fetch_items(&ids)
                    .await
                    .into_iter()
                    .filter(|story| story.matches(&needle))
                    .map(|story| story.id)
                    .collect()
            }
            None => ids,
        };

        let start = (page - 1).saturating_mul(per_page);
        let page_ids: Vec<u64> = filtered.iter().copied().skip(start).take(per_page).collect();
        let stories = self
            .fetch_items(&page_ids)
            .await
            .into_iter()
            .filter(|story| story_type.accepts(story))
            .collect();

        let total = filtered.len();
        Ok(StoryPage {
            stories,
            total,
            current_page: page,
            total_pages: total.div_ceil(per_page),
            story_type,
        })
    }

    /// First top-level comments of a story, live ones only, with their HTML
    /// sanitized
    pub async fn fetch_comments(&self, story: &Story) -> Vec<Comment> {
        let kids: Vec<u64> = story
            .kids
            .iter()
            .copied()
            .take(self.config.comment_limit)
            .collect();

        stream::iter(kids)
            .map(|id| async move { (id, self.fetch_comment(id).await) })
            .buffered(self.config.fetch_concurrency.max(1))
            .filter_map(|(id, result)| async move {
                match result {
                    Ok(Some(comment)) if !comment.deleted && !comment.dead => Some(Comment {
                        text: ammonia::clean(&comment.text),
                        ..comment
                    }),
                    Ok(_) => None,
                    Err(e) => {
                        debug!("Skipping comment {}: {}", id, e);
                        None
                    }
                }
            })
            .collect()
            .await
    }
}

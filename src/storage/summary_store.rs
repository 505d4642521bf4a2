// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server tier of the summary cache
//!
//! One JSON blob per story at `{prefix}{storyId}.json`; a write overwrites
//! the previous record. This tier is the system of record. Records that are
//! expired or fail validation are deleted by the read that finds them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::blob::BlobStore;
use super::StorageError;
use crate::summary::types::StorySummary;
use crate::utils::{Clock, SystemClock};

pub struct ServerSummaryCache {
    store: Arc<dyn BlobStore>,
    prefix: String,
    ttl_millis: i64,
    clock: Arc<dyn Clock>,
}

impl ServerSummaryCache {
    pub fn new(store: Arc<dyn BlobStore>, prefix: impl Into<String>, ttl: Duration) -> Self {
        Self::with_clock(store, prefix, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<dyn BlobStore>,
        prefix: impl Into<String>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            ttl_millis: ttl.as_millis() as i64,
            clock,
        }
    }

    pub fn path_for(&self, story_id: u64) -> String {
        format!("{}{}.json", self.prefix, story_id)
    }

    /// Live summary for `story_id`, if any
    pub async fn get(&self, story_id: u64) -> Result<Option<StorySummary>, StorageError> {
        let path = self.path_for(story_id);
        let raw = match self.store.get(&path).await {
            Ok(raw) => raw,
            Err(StorageError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(self.validate_or_purge(&path, &raw, Some(story_id)).await)
    }

    /// Store a fresh summary stamped with the current time
    pub async fn put(&self, story_id: u64, summary: &str) -> Result<StorySummary, StorageError> {
        let record = StorySummary::new(story_id, summary, self.clock.now_millis());
        let data = record.to_json()?;
        self.store.put(&self.path_for(story_id), data).await?;
        info!("Stored summary for story {} in blob store", story_id);
        Ok(record)
    }

    pub async fn delete(&self, story_id: u64) -> Result<(), StorageError> {
        self.store.delete(&self.path_for(story_id)).await?;
        info!("Deleted summary for story {}", story_id);
        Ok(())
    }

    /// Every live summary under the prefix, newest first. When several blobs
    /// carry the same story id the greatest timestamp wins.
    pub async fn list_all(&self) -> Result<Vec<StorySummary>, StorageError> {
        let paths = self.store.list(&self.prefix).await?;
        let mut latest: HashMap<u64, StorySummary> = HashMap::new();

        for path in paths {
            let raw = match self.store.get(&path).await {
                Ok(raw) => raw,
                Err(StorageError::NotFound(_)) => continue,
                Err(e) => {
                    warn!("Skipping unreadable blob {}: {}", path, e);
                    continue;
                }
            };
            let Some(record) = self.validate_or_purge(&path, &raw, None).await else {
                continue;
            };
            match latest.get(&record.story_id) {
                Some(existing) if existing.timestamp >= record.timestamp => {}
                _ => {
                    latest.insert(record.story_id, record);
                }
            }
        }

        let mut records: Vec<StorySummary> = latest.into_values().collect();
        records.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.story_id.cmp(&b.story_id))
        });
        Ok(records)
    }

    async fn validate_or_purge(
        &self,
        path: &str,
        raw: &[u8],
        expected_id: Option<u64>,
    ) -> Option<StorySummary> {
        let record = StorySummary::from_json(raw)
            .filter(|r| expected_id.map_or(true, |id| r.story_id == id));

        let reason = match &record {
            None => "corrupt",
            Some(r) if r.is_expired(self.clock.now_millis(), self.ttl_millis) => "expired",
            Some(_) => return record,
        };

        debug!("Purging {} summary blob {}", reason, path);
        if let Err(e) = self.store.delete(path).await {
            warn!("Failed to purge {}: {}", path, e);
        }
        None
    }
}

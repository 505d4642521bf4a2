// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client tier of the summary cache
//!
//! Best-effort and never authoritative. Entries live in a [`LocalStore`]
//! under `{prefix}{storyId}` and are mirrored into an in-memory index by
//! [`ClientSummaryCache::load`]. Expired or corrupt entries are removed from
//! the store by whichever read discovers them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::local::LocalStore;
use super::StorageError;
use crate::summary::types::StorySummary;
use crate::utils::{Clock, SystemClock};

pub struct ClientSummaryCache {
    store: Arc<dyn LocalStore>,
    prefix: String,
    ttl_millis: i64,
    clock: Arc<dyn Clock>,
    index: Mutex<HashMap<u64, StorySummary>>,
}

impl ClientSummaryCache {
    pub fn new(store: Arc<dyn LocalStore>, prefix: impl Into<String>, ttl: Duration) -> Self {
        Self::with_clock(store, prefix, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<dyn LocalStore>,
        prefix: impl Into<String>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            ttl_millis: ttl.as_millis() as i64,
            clock,
            index: Mutex::new(HashMap::new()),
        }
    }

    pub fn key_for(&self, story_id: u64) -> String {
        format!("{}{}", self.prefix, story_id)
    }

    /// Hydrate the index from every namespaced key. Bad entries are dropped
    /// and loading continues. Returns the number of live entries.
    pub fn load(&self) -> Result<usize, StorageError> {
        let mut loaded = HashMap::new();

        for key in self.store.keys()? {
            let Some(suffix) = key.strip_prefix(&self.prefix) else {
                continue;
            };
            let raw = match self.store.get_item(&key) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Skipping unreadable local entry {}: {}", key, e);
                    continue;
                }
            };
            let expected_id = suffix.parse::<u64>().ok();
            if let Some(record) = self.validate_or_purge(&key, &raw, expected_id) {
                loaded.insert(record.story_id, record);
            }
        }

        let count = loaded.len();
        if let Ok(mut index) = self.index.lock() {
            *index = loaded;
        }
        info!("Loaded {} cached summaries from local storage", count);
        Ok(count)
    }

    pub fn get(&self, story_id: u64) -> Option<StorySummary> {
        let now = self.clock.now_millis();
        let indexed = self
            .index
            .lock()
            .ok()
            .and_then(|index| index.get(&story_id).cloned());
        if let Some(record) = indexed {
            if !record.is_expired(now, self.ttl_millis) {
                return Some(record);
            }
        }

        let key = self.key_for(story_id);
        let raw = match self.store.get_item(&key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Local cache read failed for {}: {}", key, e);
                None
            }
        };
        let record = raw.and_then(|raw| self.validate_or_purge(&key, &raw, Some(story_id)));

        if let Ok(mut index) = self.index.lock() {
            match &record {
                Some(r) => {
                    index.insert(story_id, r.clone());
                }
                None => {
                    index.remove(&story_id);
                }
            }
        }
        record
    }

    /// Write a record produced elsewhere, keeping its timestamp
    pub fn store(&self, record: &StorySummary) -> Result<(), StorageError> {
        let value = serde_json::to_string(record)?;
        self.store.set_item(&self.key_for(record.story_id), &value)?;
        if let Ok(mut index) = self.index.lock() {
            index.insert(record.story_id, record.clone());
        }
        debug!("Cached summary for story {} locally", record.story_id);
        Ok(())
    }

    /// Store a fresh summary stamped with the current time
    pub fn put(&self, story_id: u64, summary: &str) -> Result<StorySummary, StorageError> {
        let record = StorySummary::new(story_id, summary, self.clock.now_millis());
        self.store(&record)?;
        Ok(record)
    }

    pub fn delete(&self, story_id: u64) -> Result<(), StorageError> {
        if let Ok(mut index) = self.index.lock() {
            index.remove(&story_id);
        }
        self.store.remove_item(&self.key_for(story_id))
    }

    /// All live entries, newest first
    pub fn list_all(&self) -> Result<Vec<StorySummary>, StorageError> {
        self.load()?;
        let mut records: Vec<StorySummary> = match self.index.lock() {
            Ok(index) => index.values().cloned().collect(),
            Err(_) => Vec::new(),
        };
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    fn validate_or_purge(
        &self,
        key: &str,
        raw: &str,
        expected_id: Option<u64>,
    ) -> Option<StorySummary> {
        let record = StorySummary::from_json(raw.as_bytes())
            .filter(|r| expected_id == Some(r.story_id));

        let reason = match &record {
            None => "corrupt",
            Some(r) if r.is_expired(self.clock.now_millis(), self.ttl_millis) => "expired",
            Some(_) => return record,
        };

        debug!("Removing {} local summary entry {}", reason, key);
        if let Err(e) = self.store.remove_item(key) {
            warn!("Failed to remove local entry {}: {}", key, e);
        }
        None
    }
}

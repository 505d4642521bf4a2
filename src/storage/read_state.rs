// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::sync::Arc;
use tracing::warn;

use super::local::LocalStore;
use super::StorageError;

pub const READ_STORIES_KEY: &str = "read-stories";

/// Ids of stories the reader has opened
pub struct ReadStories {
    store: Arc<dyn LocalStore>,
}

impl ReadStories {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Ids in the order they were first marked. A corrupt value reads as empty.
    pub fn read_stories(&self) -> Result<Vec<u64>, StorageError> {
        let Some(raw) = self.store.get_item(READ_STORIES_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<u64>>(&raw) {
            Ok(ids) => Ok(ids),
            Err(e) => {
                warn!("Ignoring corrupt read-state value: {}", e);
                Ok(Vec::new())
            }
        }
    }

    pub fn is_read(&self, story_id: u64) -> Result<bool, StorageError> {
        Ok(self.read_stories()?.contains(&story_id))
    }

    /// Returns true when the id was newly marked
    pub fn mark_as_read(&self, story_id: u64) -> Result<bool, StorageError> {
        let mut ids = self.read_stories()?;
        if ids.contains(&story_id) {
            return Ok(false);
        }
        ids.push(story_id);
        self.store
            .set_item(READ_STORIES_KEY, &serde_json::to_string(&ids)?)?;
        Ok(true)
    }
}

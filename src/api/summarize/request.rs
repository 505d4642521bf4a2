// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Summarize API request types

use serde::{Deserialize, Serialize};

/// Request body for POST /summarize
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    /// Article URL (required)
    #[serde(default)]
    pub url: Option<String>,

    /// Upstream story id (required)
    #[serde(default)]
    pub story_id: Option<u64>,
}

impl SummarizeRequest {
    /// Returns the `(story_id, url)` pair or the name of the first missing field
    pub fn validate(&self) -> Result<(u64, &str), String> {
        let url = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| "url".to_string())?;
        let story_id = self
            .story_id
            .filter(|id| *id > 0)
            .ok_or_else(|| "storyId".to_string())?;
        Ok((story_id, url))
    }
}

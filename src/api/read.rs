// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::errors::ApiError;
use super::http_server::AppState;
use crate::storage::run_blocking;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadStoriesResponse {
    pub read_stories: Vec<u64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    pub story_id: u64,
    pub newly_read: bool,
}

/// GET /read
pub async fn read_list_handler(
    State(state): State<AppState>,
) -> Result<Json<ReadStoriesResponse>, ApiError> {
    Ok(Json(ReadStoriesResponse {
        read_stories: state.read_stories.read_stories()?,
    }))
}

/// POST /read/:id
pub async fn mark_read_handler(
    State(state): State<AppState>,
    Path(story_id): Path<u64>,
) -> Result<Json<MarkReadResponse>, ApiError> {
    let read_stories = state.read_stories.clone();
    let newly_read = run_blocking(move || read_stories.mark_as_read(story_id)).await?;
    Ok(Json(MarkReadResponse {
        story_id,
        newly_read,
    }))
}

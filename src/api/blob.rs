// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server-tier summary cache endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::errors::ApiError;
use super::http_server::AppState;
use crate::storage::run_blocking;
use crate::summary::StorySummary;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobQuery {
    pub story_id: Option<String>,
}

impl BlobQuery {
    fn story_id(&self) -> Result<u64, ApiError> {
        self.story_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| ApiError::MissingParameter("storyId".to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutBlobRequest {
    #[serde(default)]
    pub story_id: Option<u64>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SuccessResponse {
    pub success: bool,
}

/// GET /blob?storyId= - Live summary for a story, or null
pub async fn get_blob_handler(
    State(state): State<AppState>,
    Query(query): Query<BlobQuery>,
) -> Result<Json<DataResponse<Option<StorySummary>>>, ApiError> {
    let story_id = query.story_id()?;
    let data = state.summary_service.server_cache().get(story_id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /blob - Store a summary, stamped with the current time
pub async fn put_blob_handler(
    State(state): State<AppState>,
    body: Result<Json<PutBlobRequest>, JsonRejection>,
) -> Result<Json<DataResponse<StorySummary>>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let story_id = request
        .story_id
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::MissingParameter("storyId".to_string()))?;
    let summary = request
        .summary
        .ok_or_else(|| ApiError::MissingParameter("summary".to_string()))?;

    let data = state
        .summary_service
        .server_cache()
        .put(story_id, &summary)
        .await?;

    // Replace any older local copy so the next lookup sees this record
    let client = state.summary_service.client_cache().clone();
    let record = data.clone();
    if let Err(e) = run_blocking(move || client.store(&record)).await {
        warn!("Failed to refresh local copy of story {}: {}", story_id, e);
        let client = state.summary_service.client_cache().clone();
        run_blocking(move || client.delete(story_id)).await?;
    }
    Ok(Json(DataResponse { data }))
}

/// DELETE /blob?storyId=
pub async fn delete_blob_handler(
    State(state): State<AppState>,
    Query(query): Query<BlobQuery>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let story_id = query.story_id()?;
    state.summary_service.server_cache().delete(story_id).await?;
    let client = state.summary_service.client_cache().clone();
    if let Err(e) = run_blocking(move || client.delete(story_id)).await {
        warn!("Failed to drop local copy of story {}: {}", story_id, e);
    }
    info!("Summary for story {} deleted via API", story_id);
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /blobs - Every live summary, newest first
pub async fn list_blobs_handler(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<StorySummary>>>, ApiError> {
    let data = state.summary_service.server_cache().list_all().await?;
    Ok(Json(DataResponse { data }))
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Summarize API endpoint handler

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use tracing::{debug, info};

use super::request::SummarizeRequest;
use super::response::SummarizeResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// POST /summarize - Summarize a story's linked article
///
/// # Request
/// - `url`: Article URL (required)
/// - `storyId`: Upstream story id (required)
///
/// # Response
/// - `summary`: Generated or cached summary text
///
/// # Errors
/// - 400 Bad Request: Missing `url` or `storyId`, or unreadable body
/// - 401/403/404/429/5xx: Upstream site or summarizer failure
/// - 422 Unprocessable Entity: Not enough readable content on the page
/// - 503 Service Unavailable: Every fetch attempt failed
pub async fn summarize_handler(
    State(state): State<AppState>,
    body: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let (story_id, url) = request.validate().map_err(ApiError::MissingParameter)?;
    debug!("Summarize request for story {}", story_id);

    let summary = state
        .summary_service
        .get_or_create_summary(story_id, url)
        .await?;

    info!("Summary ready for story {}", story_id);
    Ok(Json(SummarizeResponse { summary }))
}

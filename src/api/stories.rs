// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Story, item, comment and user endpoints backed by the HN client

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use super::errors::ApiError;
use super::http_server::AppState;
use crate::hn::{Comment, Story, StoryPage, StoryType, User};

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    10
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoriesQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    #[serde(default, alias = "q")]
    pub query: Option<String>,
    #[serde(default, rename = "type")]
    pub story_type: Option<String>,
}

impl StoriesQuery {
    pub fn validate(&self) -> Result<StoryType, ApiError> {
        if self.per_page > 100 {
            return Err(ApiError::InvalidRequest(
                "perPage cannot exceed 100".to_string(),
            ));
        }
        match self.story_type.as_deref() {
            None | Some("") => Ok(StoryType::Top),
            Some(raw) => raw.parse().map_err(ApiError::InvalidRequest),
        }
    }
}

/// GET /stories?page=&perPage=&query=&type=
pub async fn stories_handler(
    State(state): State<AppState>,
    Query(query): Query<StoriesQuery>,
) -> Result<Json<StoryPage>, ApiError> {
    let story_type = query.validate()?;
    debug!(
        "Stories request: type={}, page={}, per_page={}",
        story_type, query.page, query.per_page
    );

    let page = state
        .hn
        .get_stories(query.page, query.per_page, query.query.as_deref(), story_type)
        .await?;
    Ok(Json(page))
}

async fn load_story(state: &AppState, id: u64) -> Result<Story, ApiError> {
    state
        .hn
        .fetch_item(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("item {}", id)))
}

/// GET /items/:id
pub async fn item_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Story>, ApiError> {
    Ok(Json(load_story(&state, id).await?))
}

/// GET /items/:id/comments
pub async fn comments_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let story = load_story(&state, id).await?;
    Ok(Json(state.hn.fetch_comments(&story).await))
}

/// GET /users/:id
pub async fn user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    state
        .hn
        .fetch_user(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("user {}", id)))
}

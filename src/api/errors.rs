// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, warn};

use crate::hn::HnError;
use crate::storage::StorageError;
use crate::summary::SummaryError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
    pub retryable: bool,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    MissingParameter(String),
    InvalidRequest(String),
    NotFound(String),
    Summary(SummaryError),
    Storage(StorageError),
    Upstream(String),
    Internal(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (kind, message, retryable) = match self {
            ApiError::MissingParameter(name) => (
                "missing_parameter",
                format!("Missing required parameter: {}", name),
                false,
            ),
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), false),
            ApiError::NotFound(msg) => ("not_found", msg.clone(), false),
            ApiError::Summary(e) => (e.kind(), e.user_message(), e.is_retryable()),
            ApiError::Storage(_) => (
                "storage_failed",
                "Failed to access the summary store".to_string(),
                true,
            ),
            ApiError::Upstream(_) => (
                "upstream_failed",
                "The story source is unavailable".to_string(),
                true,
            ),
            ApiError::Internal(_) => (
                "internal_error",
                "An unexpected error occurred".to_string(),
                false,
            ),
        };

        ErrorResponse {
            error: message,
            kind: kind.to_string(),
            retryable,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::MissingParameter(_) | ApiError::InvalidRequest(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Summary(e) => e.status_code(),
            ApiError::Storage(_) => 500,
            ApiError::Upstream(_) => 502,
            ApiError::Internal(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingParameter(name) => write!(f, "Missing parameter: {}", name),
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Summary(e) => write!(f, "{}", e),
            ApiError::Storage(e) => write!(f, "{}", e),
            ApiError::Upstream(msg) => write!(f, "Upstream error: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<SummaryError> for ApiError {
    fn from(err: SummaryError) -> Self {
        match err {
            SummaryError::MissingParameter(name) => ApiError::MissingParameter(name),
            other => ApiError::Summary(other),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}

impl From<HnError> for ApiError {
    fn from(err: HnError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        (status, Json(self.to_response())).into_response()
    }
}

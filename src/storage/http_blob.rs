// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! REST object store client
//!
//! `PUT|GET|DELETE {base}/{path}` for single blobs, `GET {base}?prefix=`
//! for listings returning `[{"pathname": ...}]`. Requests carry the
//! read-write token as a bearer credential.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use super::blob::{validate_path, BlobStore};
use super::StorageError;

#[derive(Debug, Deserialize)]
struct ListedBlob {
    pathname: String,
}

pub struct HttpBlobStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBlobStore {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| StorageError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn blob_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn make_request(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        query: Option<(&str, &str)>,
    ) -> Result<reqwest::Response, StorageError> {
        let mut request_builder = self.client.request(method, url);

        if let Some(token) = &self.token {
            request_builder = request_builder.bearer_auth(token);
        }

        if let Some(pair) = query {
            request_builder = request_builder.query(&[pair]);
        }

        if let Some(body) = body {
            request_builder = request_builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request_builder
            .send()
            .await
            .map_err(|e| StorageError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StorageError::AuthError(format!("Blob store returned {}", status)));
        }
        if status.is_server_error() {
            return Err(StorageError::ServerError(format!(
                "Server error: {}",
                status
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put(&self, path: &str, data: Vec<u8>) -> Result<(), StorageError> {
        validate_path(path)?;
        let response = self
            .make_request(Method::PUT, &self.blob_url(path), Some(data), None)
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(StorageError::ServerError(format!(
                "Upload failed: {}",
                response.status()
            )))
        }
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        validate_path(path)?;
        let response = self
            .make_request(Method::GET, &self.blob_url(path), None, None)
            .await?;

        match response.status() {
            s if s.is_success() => Ok(response
                .bytes()
                .await
                .map_err(|e| StorageError::NetworkError(e.to_string()))?
                .to_vec()),
            StatusCode::NOT_FOUND => Err(StorageError::NotFound(path.to_string())),
            s => Err(StorageError::ServerError(format!("Download failed: {}", s))),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let response = self
            .make_request(Method::GET, &self.base_url, None, Some(("prefix", prefix)))
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::ServerError(format!(
                "List failed: {}",
                response.status()
            )));
        }

        let listed: Vec<ListedBlob> = response
            .json()
            .await
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        Ok(listed
            .into_iter()
            .map(|b| b.pathname)
            .filter(|p| p.starts_with(prefix))
            .collect())
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        validate_path(path)?;
        let response = self
            .make_request(Method::DELETE, &self.blob_url(path), None, None)
            .await?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Ok(()),
            s => Err(StorageError::ServerError(format!("Delete failed: {}", s))),
        }
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::StorageError;

/// Addressable object store holding opaque blobs
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write a blob, replacing any previous content at `path`
    async fn put(&self, path: &str, data: Vec<u8>) -> Result<(), StorageError>;
    /// Read a blob; `StorageError::NotFound` when absent
    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError>;
    /// Paths of all blobs whose path starts with `prefix`
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
    /// Remove a blob; removing an absent blob succeeds
    async fn delete(&self, path: &str) -> Result<(), StorageError>;
}

pub(crate) fn validate_path(path: &str) -> Result<(), StorageError> {
    if path.is_empty() {
        return Err(StorageError::InvalidPath("Empty path".to_string()));
    }

    if path.starts_with('/') {
        return Err(StorageError::InvalidPath(
            "Path cannot start with /".to_string(),
        ));
    }

    if path.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidPath(
            "Path traversal not allowed".to_string(),
        ));
    }

    Ok(())
}

/// In-memory blob store for tests and ephemeral deployments
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    injected_error: Arc<Mutex<Option<StorageError>>>,
    fail_writes: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next operation with `error`
    pub async fn inject_error(&self, error: StorageError) {
        *self.injected_error.lock().await = Some(error);
    }

    /// Reject every `put` until reset
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.blobs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.lock().await.is_empty()
    }

    async fn check_injected_error(&self) -> Result<(), StorageError> {
        let mut error_opt = self.injected_error.lock().await;
        if let Some(error) = error_opt.take() {
            return Err(error);
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &str, data: Vec<u8>) -> Result<(), StorageError> {
        self.check_injected_error().await?;
        validate_path(path)?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::ServerError("writes disabled".to_string()));
        }
        self.blobs.lock().await.insert(path.to_string(), data);
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.check_injected_error().await?;
        validate_path(path)?;
        self.blobs
            .lock()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        self.check_injected_error().await?;
        Ok(self
            .blobs
            .lock()
            .await
            .keys()
            .filter(|path| path.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.check_injected_error().await?;
        validate_path(path)?;
        self.blobs.lock().await.remove(path);
        Ok(())
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod blob;
pub mod config;
pub mod fs_blob;
pub mod http_blob;
pub mod local;
pub mod local_cache;
pub mod read_state;
pub mod summary_store;

use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Authentication error: {0}")]
    AuthError(String),
    #[error("Server error: {0}")]
    ServerError(String),
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::SerializationError(err.to_string())
    }
}

// Re-export main types for convenience
pub use blob::{BlobStore, MemoryBlobStore};
pub use config::{BlobBackend, StorageConfig};
pub use fs_blob::FsBlobStore;
pub use http_blob::HttpBlobStore;
pub use local::{FileLocalStore, LocalStore, MemoryLocalStore};
pub use local_cache::ClientSummaryCache;
pub use read_state::ReadStories;
pub use summary_store::ServerSummaryCache;

/// Build the blob backend selected by configuration
pub fn build_blob_store(config: &StorageConfig) -> Result<Arc<dyn BlobStore>, StorageError> {
    let store: Arc<dyn BlobStore> = match config.backend {
        BlobBackend::Memory => Arc::new(MemoryBlobStore::new()),
        BlobBackend::Fs => Arc::new(FsBlobStore::new(&config.blob_dir)?),
        BlobBackend::Http => {
            let base_url = config.blob_base_url.clone().ok_or_else(|| {
                StorageError::InvalidPath("BLOB_BASE_URL is required for the http backend".into())
            })?;
            Arc::new(HttpBlobStore::new(base_url, config.blob_token.clone())?)
        }
    };
    Ok(store)
}

/// Run a synchronous local-store operation on the blocking pool.
/// `FileLocalStore` rewrites its whole file on every mutation.
pub async fn run_blocking<T, F>(op: F) -> Result<T, StorageError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| StorageError::Io(e.to_string()))?
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Storage configuration for both summary tiers

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Blob store implementation behind the server tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobBackend {
    Memory,
    Fs,
    Http,
}

impl FromStr for BlobBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "fs" | "file" => Ok(Self::Fs),
            "http" => Ok(Self::Http),
            other => Err(format!("unknown blob backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Backend for the server tier (default: fs)
    pub backend: BlobBackend,
    /// Root directory for the fs backend
    pub blob_dir: PathBuf,
    /// Base URL for the http backend
    pub blob_base_url: Option<String>,
    /// Bearer token for the http backend
    pub blob_token: Option<String>,
    /// Path prefix for summary blobs (default: "summaries/")
    pub blob_prefix: String,
    /// File backing the client tier
    pub local_store_path: PathBuf,
    /// Summary TTL in seconds, both tiers (default: 24 hours)
    pub ttl_secs: u64,
    /// Key prefix for client tier entries (default: "story-summary-")
    pub key_prefix: String,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: env::var("BLOB_BACKEND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.backend),
            blob_dir: env::var("BLOB_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.blob_dir),
            blob_base_url: env::var("BLOB_BASE_URL").ok().filter(|v| !v.is_empty()),
            blob_token: env::var("BLOB_READ_WRITE_TOKEN").ok().filter(|v| !v.is_empty()),
            blob_prefix: env::var("BLOB_PREFIX").unwrap_or(defaults.blob_prefix),
            local_store_path: env::var("LOCAL_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.local_store_path),
            ttl_secs: env::var("SUMMARY_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ttl_secs),
            key_prefix: env::var("SUMMARY_KEY_PREFIX").unwrap_or(defaults.key_prefix),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.ttl_secs == 0 {
            return Err("ttl_secs must be at least 1".to_string());
        }
        if self.key_prefix.is_empty() {
            return Err("key_prefix must not be empty".to_string());
        }
        if self.blob_prefix.starts_with('/') || self.blob_prefix.contains("..") {
            return Err(format!("invalid blob prefix: {}", self.blob_prefix));
        }
        if self.backend == BlobBackend::Http && self.blob_base_url.is_none() {
            return Err("BLOB_BASE_URL is required for the http backend".to_string());
        }
        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BlobBackend::Fs,
            blob_dir: PathBuf::from("./data/blobs"),
            blob_base_url: None,
            blob_token: None,
            blob_prefix: "summaries/".to_string(),
            local_store_path: PathBuf::from("./data/local-storage.json"),
            ttl_secs: 24 * 60 * 60,
            key_prefix: "story-summary-".to_string(),
        }
    }
}

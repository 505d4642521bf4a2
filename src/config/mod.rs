// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Every concern owns a `*Config` with `from_env()`, `Default` and
//! `validate()`. [`AppConfig`] gathers them for the binaries.

use std::env;

use crate::hn::HnConfig;
use crate::storage::StorageConfig;
use crate::summary::{FetchConfig, SummarizerConfig};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds (default: 127.0.0.1:3000)
    pub listen_addr: String,
    /// Allow any origin, method and header (default: true)
    pub cors_permissive: bool,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            listen_addr: env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            cors_permissive: env::var("CORS_PERMISSIVE")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(defaults.cors_permissive),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.listen_addr
            .parse::<std::net::SocketAddr>()
            .map(|_| ())
            .map_err(|e| format!("invalid LISTEN_ADDR {}: {}", self.listen_addr, e))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3000".to_string(),
            cors_permissive: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub fetch: FetchConfig,
    pub summarizer: SummarizerConfig,
    pub storage: StorageConfig,
    pub hn: HnConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            fetch: FetchConfig::from_env(),
            summarizer: SummarizerConfig::from_env(),
            storage: StorageConfig::from_env(),
            hn: HnConfig::from_env(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.fetch.validate()?;
        self.summarizer.validate()?;
        self.storage.validate()?;
        self.hn.validate()?;
        Ok(())
    }
}

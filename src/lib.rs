// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod hn;
pub mod storage;
pub mod summary;
pub mod utils;
pub mod version;

// Re-export main types
pub use api::{create_router, AppState};
pub use config::AppConfig;
pub use storage::{ClientSummaryCache, ServerSummaryCache, StorageError};
pub use summary::{StorySummary, SummaryError, SummaryService};

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod blob;
pub mod errors;
pub mod health;
pub mod http_server;
pub mod read;
pub mod stories;
pub mod summarize;

pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_router, start_server, AppState};
pub use summarize::{SummarizeRequest, SummarizeResponse};

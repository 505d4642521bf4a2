// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Summarization API endpoint
//!
//! Provides the `/summarize` HTTP endpoint.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::summarize_handler;
pub use request::SummarizeRequest;
pub use response::SummarizeResponse;

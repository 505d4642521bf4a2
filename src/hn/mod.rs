// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod client;
pub mod config;
pub mod types;

pub use client::{HnClient, HnError};
pub use config::HnConfig;
pub use types::{Comment, Story, StoryPage, StoryType, User};

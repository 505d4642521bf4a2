// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Fancy HN service

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "story-summaries",
    "user-agent-rotation",
    "two-tier-summary-cache",
    "summary-ttl",
    "in-flight-coalescing",
    "llm-rate-limiting",
    "read-state",
    "story-search",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Fancy HN {}", VERSION_NUMBER)
}

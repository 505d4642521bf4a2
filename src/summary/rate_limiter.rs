// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Rate limiting for language model requests

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

use super::summarizer::SummarizerError;

const FALLBACK_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(30) {
    Some(n) => n,
    None => NonZeroU32::MIN,
};

/// Rate limiter in front of the hosted model
pub struct SummarizerRateLimiter {
    limiter: Arc<GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    requests_per_minute: u32,
}

impl SummarizerRateLimiter {
    /// Create a new rate limiter
    ///
    /// # Arguments
    /// * `requests_per_minute` - Maximum requests allowed per minute
    pub fn new(requests_per_minute: u32) -> Self {
        let rpm = NonZeroU32::new(requests_per_minute).unwrap_or(FALLBACK_PER_MINUTE);
        let limiter = Arc::new(GovRateLimiter::direct(Quota::per_minute(rpm)));

        Self {
            limiter,
            requests_per_minute,
        }
    }

    /// Returns Ok(()) if allowed, or SummarizerError::RateLimited if not
    pub fn check(&self) -> Result<(), SummarizerError> {
        self.limiter
            .check()
            .map_err(|_| SummarizerError::RateLimited {
                retry_after_secs: Some(60),
            })
    }

    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }
}

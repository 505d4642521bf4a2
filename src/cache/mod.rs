// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Process-wide TTL cache
//!
//! A bounded LRU map whose entries carry an insertion timestamp. Created once
//! at startup and handed to the components that need it; entries only go away
//! through capacity eviction, [`TtlCache::invalidate`] or [`TtlCache::clear`].
//! Expired entries are hidden from [`TtlCache::get`] but stay readable through
//! [`TtlCache::get_stale`] so callers can fall back to the last known value
//! when the upstream is down.

use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::utils::{Clock, SystemClock};

struct TtlEntry<V> {
    value: V,
    inserted_at: i64,
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    /// Total entries in cache
    pub total: usize,
    /// Expired entries (not yet evicted)
    pub expired: usize,
    /// Maximum cache capacity
    pub max: usize,
}

pub struct TtlCache<K: Hash + Eq, V> {
    entries: Mutex<LruCache<K, TtlEntry<V>>>,
    ttl_millis: i64,
    max_entries: usize,
    clock: Arc<dyn Clock>,
}

impl<K: Hash + Eq, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self::with_clock(ttl, max_entries, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl_millis: ttl.as_millis() as i64,
            max_entries: capacity.get(),
            clock,
        }
    }

    /// Get a value if present and younger than the TTL
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().ok()?;
        let now = self.clock.now_millis();
        let entry = entries.get(key)?;

        if now - entry.inserted_at >= self.ttl_millis {
            return None;
        }

        Some(entry.value.clone())
    }

    /// Get a value regardless of its age
    pub fn get_stale(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().ok()?;
        entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn insert(&self, key: K, value: V) {
        let inserted_at = self.clock.now_millis();
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(key, TtlEntry { value, inserted_at });
        }
    }

    pub fn invalidate(&self, key: &K) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.pop(key);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        let entries = match self.entries.lock() {
            Ok(e) => e,
            Err(_) => {
                return CacheStats {
                    total: 0,
                    expired: 0,
                    max: self.max_entries,
                }
            }
        };
        let now = self.clock.now_millis();
        let expired = entries
            .iter()
            .filter(|(_, e)| now - e.inserted_at >= self.ttl_millis)
            .count();

        CacheStats {
            total: entries.len(),
            expired,
            max: self.max_entries,
        }
    }
}

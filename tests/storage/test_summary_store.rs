// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use fancy_hn::storage::{BlobStore, FsBlobStore, ServerSummaryCache};
use fancy_hn::utils::{ManualClock, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const DAY: Duration = Duration::from_secs(86_400);

fn fs_cache(dir: &TempDir, clock: Arc<ManualClock>) -> (Arc<FsBlobStore>, ServerSummaryCache) {
    let store = Arc::new(FsBlobStore::new(dir.path()).unwrap());
    let cache = ServerSummaryCache::with_clock(store.clone(), "summaries/", DAY, clock);
    (store, cache)
}

#[tokio::test]
async fn test_round_trip_stamps_current_time() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FsBlobStore::new(dir.path()).unwrap());
    let cache = ServerSummaryCache::with_clock(store, "summaries/", DAY, Arc::new(SystemClock));

    let before = chrono::Utc::now().timestamp_millis();
    cache.put(12345, "A friendly greeting.").await.unwrap();
    let after = chrono::Utc::now().timestamp_millis();

    let record = cache.get(12345).await.unwrap().unwrap();
    assert_eq!(record.story_id, 12345);
    assert_eq!(record.summary, "A friendly greeting.");
    assert!(record.timestamp >= before && record.timestamp <= after);
    assert!(dir.path().join("summaries/12345.json").exists());
}

#[tokio::test]
async fn test_expired_record_is_purged_on_read() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let (_store, cache) = fs_cache(&dir, clock.clone());

    cache.put(1, "old news").await.unwrap();
    clock.advance_secs(DAY.as_secs() - 1);
    assert!(cache.get(1).await.unwrap().is_some());

    clock.advance_secs(1);
    assert!(cache.get(1).await.unwrap().is_none());
    assert!(!dir.path().join("summaries/1.json").exists());
}

#[tokio::test]
async fn test_corrupt_blob_is_purged() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let (store, cache) = fs_cache(&dir, clock);

    store
        .put("summaries/8.json", b"{not json".to_vec())
        .await
        .unwrap();

    assert!(cache.get(8).await.unwrap().is_none());
    assert!(store.get("summaries/8.json").await.is_err());
}

#[tokio::test]
async fn test_list_all_is_newest_first_and_skips_dead_records() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let (store, cache) = fs_cache(&dir, clock.clone());

    cache.put(1, "first").await.unwrap();
    clock.advance_secs(60);
    cache.put(2, "second").await.unwrap();
    store
        .put("summaries/3.json", b"garbage".to_vec())
        .await
        .unwrap();

    let all = cache.list_all().await.unwrap();
    let ids: Vec<u64> = all.iter().map(|s| s.story_id).collect();
    assert_eq!(ids, vec![2, 1]);

    // First record crosses the TTL, second is still live
    clock.advance_secs(DAY.as_secs() - 30);
    let all = cache.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].story_id, 2);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let (_store, cache) = fs_cache(&dir, clock);

    cache.put(4, "gone soon").await.unwrap();
    cache.delete(4).await.unwrap();
    cache.delete(4).await.unwrap();
    assert!(cache.get(4).await.unwrap().is_none());
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use fancy_hn::storage::{ClientSummaryCache, FileLocalStore, LocalStore, ReadStories};
use fancy_hn::utils::ManualClock;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const DAY: Duration = Duration::from_secs(86_400);
const START: i64 = 1_700_000_000_000;

fn open_cache(path: &std::path::Path, clock: Arc<ManualClock>) -> (Arc<FileLocalStore>, ClientSummaryCache) {
    let store = Arc::new(FileLocalStore::open(path).unwrap());
    let cache = ClientSummaryCache::with_clock(store.clone(), "story-summary-", DAY, clock);
    (store, cache)
}

#[test]
fn test_summaries_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("local.json");
    let clock = Arc::new(ManualClock::new(START));

    {
        let (_store, cache) = open_cache(&path, clock.clone());
        cache.put(1, "one").unwrap();
        cache.put(2, "two").unwrap();
    }

    let (_store, cache) = open_cache(&path, clock);
    assert_eq!(cache.load().unwrap(), 2);
    assert_eq!(cache.get(1).unwrap().summary, "one");
    assert_eq!(cache.get(2).unwrap().summary, "two");
}

#[test]
fn test_load_discards_corrupt_and_expired_entries() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("local.json");
    let clock = Arc::new(ManualClock::new(START));

    {
        let (store, cache) = open_cache(&path, clock.clone());
        cache.put(1, "stale").unwrap();
        store.set_item("story-summary-2", "{broken").unwrap();
        store.set_item("unrelated", "keep me").unwrap();
    }

    clock.advance_secs(DAY.as_secs());
    let (store, cache) = open_cache(&path, clock.clone());
    cache.put(3, "fresh").unwrap();

    assert_eq!(cache.load().unwrap(), 1);
    assert!(cache.get(1).is_none());
    assert!(store.get_item("story-summary-1").unwrap().is_none());
    assert!(store.get_item("story-summary-2").unwrap().is_none());
    assert_eq!(store.get_item("unrelated").unwrap().as_deref(), Some("keep me"));
    assert_eq!(cache.list_all().unwrap().len(), 1);
}

#[test]
fn test_corrupt_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("local.json");
    std::fs::write(&path, b"not a json object").unwrap();

    let (store, cache) = open_cache(&path, Arc::new(ManualClock::new(START)));
    assert_eq!(cache.load().unwrap(), 0);

    cache.put(5, "recovered").unwrap();
    drop(store);
    let reopened = FileLocalStore::open(&path).unwrap();
    assert!(reopened.get_item("story-summary-5").unwrap().is_some());
}

#[test]
fn test_read_state_persists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("local.json");

    {
        let read = ReadStories::new(Arc::new(FileLocalStore::open(&path).unwrap()));
        assert!(read.mark_as_read(100).unwrap());
        assert!(read.mark_as_read(200).unwrap());
        assert!(!read.mark_as_read(100).unwrap());
    }

    let read = ReadStories::new(Arc::new(FileLocalStore::open(&path).unwrap()));
    assert_eq!(read.read_stories().unwrap(), vec![100, 200]);
    assert!(read.is_read(200).unwrap());
    assert!(!read.is_read(300).unwrap());
}

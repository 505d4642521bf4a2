// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use fancy_hn::storage::{
    BlobStore, ClientSummaryCache, LocalStore, MemoryBlobStore, MemoryLocalStore,
    ServerSummaryCache,
};
use fancy_hn::summary::{
    ContentFetcher, FetchFailureKind, StorySummary, SummarizerError, SummaryError, SummaryService,
};
use std::sync::Arc;
use std::time::Duration;

use super::support::{
    greeting_page, spawn_site, test_fetch_config, CountingSummarizer, SiteBehavior,
};

const DAY: Duration = Duration::from_secs(86_400);

struct Harness {
    service: SummaryService,
    summarizer: Arc<CountingSummarizer>,
    blobs: Arc<MemoryBlobStore>,
    local: Arc<MemoryLocalStore>,
}

fn harness(summarizer: CountingSummarizer) -> Harness {
    let summarizer = Arc::new(summarizer);
    let blobs = Arc::new(MemoryBlobStore::new());
    let local = Arc::new(MemoryLocalStore::new());
    let server = Arc::new(ServerSummaryCache::new(blobs.clone(), "summaries/", DAY));
    let client = Arc::new(ClientSummaryCache::new(local.clone(), "story-summary-", DAY));
    let fetcher = Arc::new(ContentFetcher::new(test_fetch_config(1)).unwrap());

    Harness {
        service: SummaryService::new(fetcher, summarizer.clone(), client, server),
        summarizer,
        blobs,
        local,
    }
}

#[tokio::test]
async fn test_fresh_story_is_summarized_and_written_to_both_tiers() {
    let (url, site) = spawn_site(SiteBehavior::Serve(greeting_page())).await;
    let h = harness(CountingSummarizer::replying("A friendly greeting."));

    let summary = h.service.get_or_create_summary(12345, &url).await.unwrap();

    assert_eq!(summary, "A friendly greeting.");
    assert_eq!(site.attempts(), 1);
    assert_eq!(h.summarizer.calls(), 1);

    let excerpt = h.summarizer.last_excerpt().unwrap();
    assert!(excerpt.starts_with("Hello World Hello World"));
    assert!(!excerpt.contains('<'));

    let raw = h.blobs.get("summaries/12345.json").await.unwrap();
    let stored = StorySummary::from_json(&raw).unwrap();
    assert_eq!(stored.story_id, 12345);
    assert_eq!(stored.summary, "A friendly greeting.");

    let local_raw = h.local.get_item("story-summary-12345").unwrap().unwrap();
    let local_record = StorySummary::from_json(local_raw.as_bytes()).unwrap();
    assert_eq!(local_record.summary, "A friendly greeting.");
}

#[tokio::test]
async fn test_repeat_calls_are_served_from_cache() {
    let (url, site) = spawn_site(SiteBehavior::Serve(greeting_page())).await;
    let h = harness(CountingSummarizer::replying("Cached once."));

    let first = h.service.get_or_create_summary(7, &url).await.unwrap();
    let second = h.service.get_or_create_summary(7, &url).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(site.attempts(), 1);
    assert_eq!(h.summarizer.calls(), 1);
}

#[tokio::test]
async fn test_thin_page_never_reaches_summarizer() {
    let thin = format!("<html><body><p>{}</p></body></html>", "x".repeat(40));
    let (url, _site) = spawn_site(SiteBehavior::Serve(thin)).await;
    let h = harness(CountingSummarizer::replying("unused"));

    let err = h.service.get_or_create_summary(99, &url).await.unwrap_err();

    assert_eq!(
        err,
        SummaryError::InsufficientContent {
            length: 40,
            min: 100
        }
    );
    assert_eq!(h.summarizer.calls(), 0);
    assert!(h.blobs.is_empty().await);
}

#[tokio::test]
async fn test_blocked_site_reports_forbidden() {
    let (url, _site) = spawn_site(SiteBehavior::AlwaysStatus(403)).await;
    let h = harness(CountingSummarizer::replying("unused"));

    let err = h.service.get_or_create_summary(5, &url).await.unwrap_err();

    assert_eq!(err.status_code(), 403);
    match err {
        SummaryError::FetchFailed { kind, .. } => assert_eq!(kind, FetchFailureKind::Blocked),
        other => panic!("expected fetch failure, got {:?}", other),
    }
    assert_eq!(h.summarizer.calls(), 0);
}

#[tokio::test]
async fn test_summarizer_failure_is_retried_on_next_call() {
    let (url, site) = spawn_site(SiteBehavior::Serve(greeting_page())).await;
    let h = harness(CountingSummarizer::failing(SummarizerError::Failed(
        "upstream 500".to_string(),
    )));

    let first = h.service.get_or_create_summary(11, &url).await.unwrap_err();
    let second = h.service.get_or_create_summary(11, &url).await.unwrap_err();

    assert_eq!(first.status_code(), 502);
    assert_eq!(second.status_code(), 502);
    assert_eq!(site.attempts(), 2);
    assert_eq!(h.summarizer.calls(), 2);
    assert!(h.blobs.is_empty().await);
}

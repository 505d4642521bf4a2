// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde_json::json;

use super::support::spawn_app;

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let (status, body) = app.get_json("/health").await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_summarize_then_cached() {
    let app = spawn_app().await;
    let url = format!("{}/article", app.site);

    let (status, body) = app
        .post_json("/summarize", json!({ "url": url, "storyId": 12345 }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["summary"], "A friendly greeting.");

    let (status, again) = app
        .post_json("/summarize", json!({ "url": url, "storyId": 12345 }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(again, body);
    assert_eq!(app.summarizer.calls(), 1);

    let (status, blob) = app.get_json("/blob?storyId=12345").await;
    assert_eq!(status, 200);
    assert_eq!(blob["data"]["storyId"], 12345);
    assert_eq!(blob["data"]["summary"], "A friendly greeting.");
    assert!(blob["data"]["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_summarize_missing_parameters() {
    let app = spawn_app().await;

    let (status, body) = app
        .post_json("/summarize", json!({ "storyId": 1 }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["kind"], "missing_parameter");
    assert_eq!(body["retryable"], false);

    let (status, body) = app
        .post_json("/summarize", json!({ "url": "https://example.com/a" }))
        .await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("storyId"));
}

#[tokio::test]
async fn test_summarize_malformed_body() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/summarize"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "invalid_request");
}

#[tokio::test]
async fn test_summarize_blocked_site() {
    let app = spawn_app().await;
    let url = format!("{}/blocked", app.site);

    let (status, body) = app
        .post_json("/summarize", json!({ "url": url, "storyId": 9 }))
        .await;

    assert_eq!(status, 403);
    assert_eq!(body["kind"], "fetch_failed");
    assert!(!body["error"].as_str().unwrap().contains("127.0.0.1"));
    assert_eq!(app.summarizer.calls(), 0);
    assert!(app.blobs.is_empty().await);
}

#[tokio::test]
async fn test_summarize_rejects_non_http_url() {
    let app = spawn_app().await;

    let (status, body) = app
        .post_json("/summarize", json!({ "url": "ftp://example.com/a", "storyId": 10 }))
        .await;

    assert_eq!(status, 400);
    assert_eq!(body["kind"], "invalid_url");
    assert_eq!(body["retryable"], false);
    assert_eq!(app.summarizer.calls(), 0);
}

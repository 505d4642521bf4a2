// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Running API server wired to in-memory stores, a fake article site and a
//! fake upstream story source

use async_trait::async_trait;
use axum::extract::Path;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use fancy_hn::hn::{HnClient, HnConfig};
use fancy_hn::storage::{
    ClientSummaryCache, LocalStore, MemoryBlobStore, MemoryLocalStore, ReadStories,
    ServerSummaryCache,
};
use fancy_hn::summary::{
    ContentFetcher, FetchConfig, Summarizer, SummarizerError, SummaryService,
};
use fancy_hn::{create_router, AppState};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const RUST_STORY_ID: u64 = 7;
pub const STORY_WITH_COMMENTS: u64 = 50;

pub struct FixedSummarizer {
    calls: AtomicUsize,
}

impl FixedSummarizer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for FixedSummarizer {
    async fn summarize(&self, _excerpt: &str) -> Result<String, SummarizerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("A friendly greeting.".to_string())
    }
}

pub struct TestApp {
    pub base: String,
    pub site: String,
    pub client: reqwest::Client,
    pub summarizer: Arc<FixedSummarizer>,
    pub blobs: Arc<MemoryBlobStore>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap_or(Value::Null))
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (u16, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap_or(Value::Null))
    }
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn story_json(id: u64) -> Value {
    let title = if id == RUST_STORY_ID {
        "Rust is fast".to_string()
    } else {
        format!("Story {}", id)
    };
    let mut story = json!({
        "id": id,
        "title": title,
        "by": format!("user{}", id),
        "score": 10,
        "time": 1_700_000_000,
        "descendants": 0,
        "type": "story",
    });
    // Story 3 is a text post without a link
    if id != 3 {
        story["url"] = json!(format!("https://example.com/{}", id));
    }
    story
}

fn item_json(id: u64) -> Value {
    match id {
        1..=25 => story_json(id),
        STORY_WITH_COMMENTS => json!({
            "id": STORY_WITH_COMMENTS,
            "title": "Discussion",
            "by": "host",
            "url": "https://example.com/discussion",
            "type": "story",
            "kids": [51, 52, 53],
            "descendants": 3,
        }),
        51 => json!({
            "id": 51, "by": "alice", "parent": STORY_WITH_COMMENTS, "type": "comment",
            "text": "<script>alert(1)</script><b>bold</b> claim",
        }),
        52 => json!({ "id": 52, "parent": STORY_WITH_COMMENTS, "type": "comment", "deleted": true }),
        53 => json!({
            "id": 53, "by": "bob", "parent": STORY_WITH_COMMENTS, "type": "comment",
            "text": "plain reply",
        }),
        _ => Value::Null,
    }
}

fn strip_json(file: &str) -> &str {
    file.strip_suffix(".json").unwrap_or(file)
}

async fn item(Path(file): Path<String>) -> Response {
    let id = strip_json(&file).parse::<u64>().unwrap_or(0);
    Json(item_json(id)).into_response()
}

async fn user(Path(file): Path<String>) -> Response {
    let body = match strip_json(&file) {
        "pg" => json!({ "id": "pg", "karma": 155_000, "created": 1_160_418_092, "submitted": [1, 2] }),
        _ => Value::Null,
    };
    Json(body).into_response()
}

/// Fake upstream: max item 2000 caps top lists at 20 ids
async fn spawn_hn() -> String {
    let app = Router::new()
        .route("/maxitem.json", get(|| async { Json(json!(2000)) }))
        .route(
            "/topstories.json",
            get(|| async { Json(json!((1..=25).collect::<Vec<u64>>())) }),
        )
        .route("/item/:file", get(item))
        .route("/user/:file", get(user));
    serve(app).await
}

async fn spawn_site() -> String {
    let page = format!(
        "<html><body>{}</body></html>",
        "<p>Hello <b>World</b></p>".repeat(20)
    );
    let app = Router::new()
        .route(
            "/article",
            get(move || {
                let page = page.clone();
                async move { page }
            }),
        )
        .route(
            "/blocked",
            get(|| async { axum::http::StatusCode::FORBIDDEN }),
        );
    serve(app).await
}

pub async fn spawn_app() -> TestApp {
    let ttl = Duration::from_secs(86_400);
    let blobs = Arc::new(MemoryBlobStore::new());
    let local: Arc<dyn LocalStore> = Arc::new(MemoryLocalStore::new());
    let server_cache = Arc::new(ServerSummaryCache::new(blobs.clone(), "summaries/", ttl));
    let client_cache = Arc::new(ClientSummaryCache::new(local.clone(), "story-summary-", ttl));

    let fetcher = Arc::new(
        ContentFetcher::new(FetchConfig {
            retries: 1,
            timeout_secs: 2,
            retry_delay_ms: 5,
            allow_private_hosts: true,
            ..FetchConfig::default()
        })
        .unwrap(),
    );
    let summarizer = Arc::new(FixedSummarizer {
        calls: AtomicUsize::new(0),
    });

    let hn = HnClient::new(HnConfig {
        api_base: spawn_hn().await,
        ..HnConfig::default()
    })
    .unwrap();

    let state = AppState {
        summary_service: Arc::new(SummaryService::new(
            fetcher,
            summarizer.clone(),
            client_cache,
            server_cache,
        )),
        hn: Arc::new(hn),
        read_stories: Arc::new(ReadStories::new(local)),
    };

    let base = serve(create_router(state, true)).await;
    TestApp {
        base,
        site: spawn_site().await,
        client: reqwest::Client::new(),
        summarizer,
        blobs,
    }
}

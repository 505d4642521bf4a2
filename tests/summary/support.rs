// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Local stand-ins for remote websites and the language model

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use fancy_hn::summary::{FetchConfig, Summarizer, SummarizerError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// How the fake site answers each request
#[derive(Clone)]
pub enum SiteBehavior {
    /// Every request gets this status and an empty body
    AlwaysStatus(u16),
    /// First `n` requests get `status`, later ones get `body` with 200
    FailThenServe { failures: usize, status: u16, body: String },
    /// Every request gets `body` with 200
    Serve(String),
}

pub struct SiteState {
    behavior: SiteBehavior,
    attempts: AtomicUsize,
    user_agents: Mutex<Vec<String>>,
}

impl SiteState {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn user_agents(&self) -> Vec<String> {
        self.user_agents.lock().unwrap().clone()
    }
}

async fn page(State(site): State<Arc<SiteState>>, headers: HeaderMap) -> Response {
    let n = site.attempts.fetch_add(1, Ordering::SeqCst);
    let ua = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    site.user_agents.lock().unwrap().push(ua);

    match &site.behavior {
        SiteBehavior::AlwaysStatus(code) => StatusCode::from_u16(*code).unwrap().into_response(),
        SiteBehavior::FailThenServe {
            failures,
            status,
            body,
        } => {
            if n < *failures {
                StatusCode::from_u16(*status).unwrap().into_response()
            } else {
                (StatusCode::OK, body.clone()).into_response()
            }
        }
        SiteBehavior::Serve(body) => (StatusCode::OK, body.clone()).into_response(),
    }
}

/// Spawn a fake site on a random port; returns the article URL
pub async fn spawn_site(behavior: SiteBehavior) -> (String, Arc<SiteState>) {
    let site = Arc::new(SiteState {
        behavior,
        attempts: AtomicUsize::new(0),
        user_agents: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/article", get(page))
        .with_state(site.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/article", addr), site)
}

/// Fetch settings suited to a loopback site: short delays, private hosts allowed
pub fn test_fetch_config(retries: u32) -> FetchConfig {
    FetchConfig {
        retries,
        timeout_secs: 2,
        retry_delay_ms: 10,
        allow_private_hosts: true,
        ..FetchConfig::default()
    }
}

pub fn greeting_page() -> String {
    format!(
        "<html><body>{}</body></html>",
        "<p>Hello <b>World</b></p>".repeat(20)
    )
}

/// Summarizer that replies with a fixed result and counts calls
pub struct CountingSummarizer {
    reply: Result<String, SummarizerError>,
    calls: AtomicUsize,
    last_excerpt: Mutex<Option<String>>,
}

impl CountingSummarizer {
    pub fn replying(summary: &str) -> Self {
        Self {
            reply: Ok(summary.to_string()),
            calls: AtomicUsize::new(0),
            last_excerpt: Mutex::new(None),
        }
    }

    pub fn failing(err: SummarizerError) -> Self {
        Self {
            reply: Err(err),
            calls: AtomicUsize::new(0),
            last_excerpt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_excerpt(&self) -> Option<String> {
        self.last_excerpt.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for CountingSummarizer {
    async fn summarize(&self, excerpt: &str) -> Result<String, SummarizerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_excerpt.lock().unwrap() = Some(excerpt.to_string());
        self.reply.clone()
    }
}

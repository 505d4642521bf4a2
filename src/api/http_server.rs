// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::blob::{delete_blob_handler, get_blob_handler, list_blobs_handler, put_blob_handler};
use super::health::health_handler;
use super::read::{mark_read_handler, read_list_handler};
use super::stories::{comments_handler, item_handler, stories_handler, user_handler};
use super::summarize::summarize_handler;
use crate::config::{AppConfig, ServerConfig};
use crate::hn::HnClient;
use crate::storage::{
    build_blob_store, ClientSummaryCache, FileLocalStore, LocalStore, ReadStories,
    ServerSummaryCache,
};
use crate::summary::{
    ChatCompletionSummarizer, ContentFetcher, SummarizerRateLimiter, SummaryService,
};

#[derive(Clone)]
pub struct AppState {
    pub summary_service: Arc<SummaryService>,
    pub hn: Arc<HnClient>,
    pub read_stories: Arc<ReadStories>,
}

impl AppState {
    /// Wire every component from configuration
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let ttl = config.storage.ttl();

        let blob_store = build_blob_store(&config.storage)?;
        let server_cache = Arc::new(ServerSummaryCache::new(
            blob_store,
            config.storage.blob_prefix.clone(),
            ttl,
        ));

        let local: Arc<dyn LocalStore> =
            Arc::new(FileLocalStore::open(&config.storage.local_store_path)?);
        let client_cache = Arc::new(ClientSummaryCache::new(
            local.clone(),
            config.storage.key_prefix.clone(),
            ttl,
        ));
        if let Err(e) = client_cache.load() {
            tracing::warn!("Failed to hydrate local summary cache: {}", e);
        }

        if !config.summarizer.has_api_key() {
            tracing::warn!("TOGETHER_API_KEY is not set, summarization requests will fail");
        }
        let fetcher = Arc::new(ContentFetcher::new(config.fetch.clone())?);
        let summarizer = Arc::new(ChatCompletionSummarizer::new(config.summarizer.clone()));
        let limiter = Arc::new(SummarizerRateLimiter::new(
            config.summarizer.rate_limit_per_minute,
        ));

        let summary_service = SummaryService::new(fetcher, summarizer, client_cache, server_cache)
            .with_limits(config.fetch.max_chars, config.fetch.min_chars)
            .with_rate_limiter(limiter);

        Ok(Self {
            summary_service: Arc::new(summary_service),
            hn: Arc::new(HnClient::new(config.hn.clone())?),
            read_stories: Arc::new(ReadStories::new(local)),
        })
    }
}

pub fn create_router(state: AppState, cors_permissive: bool) -> Router {
    let router = Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Summaries
        .route("/summarize", post(summarize_handler))
        .route(
            "/blob",
            get(get_blob_handler)
                .post(put_blob_handler)
                .delete(delete_blob_handler),
        )
        .route("/blobs", get(list_blobs_handler))
        // Upstream stories
        .route("/stories", get(stories_handler))
        .route("/items/:id", get(item_handler))
        .route("/items/:id/comments", get(comments_handler))
        .route("/users/:id", get(user_handler))
        // Read state
        .route("/read", get(read_list_handler))
        .route("/read/:id", post(mark_read_handler))
        .layer(TraceLayer::new_for_http());

    let router = if cors_permissive {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}

pub async fn start_server(state: AppState, config: &ServerConfig) -> anyhow::Result<()> {
    let app = create_router(state, config.cors_permissive);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

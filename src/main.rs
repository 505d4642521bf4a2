// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use fancy_hn::{
    api::{start_server, AppState},
    config::AppConfig,
    version,
};
use std::env;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("Starting {}", version::get_version_string());

    let config = AppConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;
    info!(
        "Blob backend: {:?}, summary TTL: {}s",
        config.storage.backend, config.storage.ttl_secs
    );

    let state = AppState::from_config(&config)?;

    tokio::select! {
        result = start_server(state, &config.server) => {
            if let Err(e) = &result {
                error!("API server stopped: {}", e);
            }
            result
        }
        _ = signal::ctrl_c() => {
            info!("Shutting down");
            Ok(())
        }
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod stories;
pub mod summaries;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::api::AppState;
use crate::config::AppConfig;

/// Fancy HN CLI
#[derive(Parser, Debug)]
#[command(name = "fancy-hn-cli")]
#[command(version)]
#[command(about = "Operator tools for the Fancy HN summary service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a story's linked article
    Summarize(summaries::SummarizeArgs),

    /// Inspect or edit the server-tier summary cache
    #[command(subcommand)]
    Cache(summaries::CacheCommand),

    /// List stories from the upstream source
    Stories(stories::StoriesArgs),

    /// Read-state tracking
    #[command(subcommand)]
    Read(stories::ReadCommand),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let config = AppConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;
    let state = AppState::from_config(&config)?;

    match cli.command {
        Commands::Summarize(args) => summaries::summarize(&state, args).await,
        Commands::Cache(command) => summaries::cache(&state, command).await,
        Commands::Stories(args) => stories::list_stories(&state, args).await,
        Commands::Read(command) => stories::read(&state, command),
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use tracing::info;

use crate::api::AppState;
use crate::storage::run_blocking;
use crate::summary::StorySummary;

/// Arguments for the summarize command
#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Upstream story id
    #[arg(long)]
    pub story_id: u64,

    /// Article URL
    #[arg(long)]
    pub url: String,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Show the live summary for a story
    Get { story_id: u64 },

    /// Store a summary by hand
    Put {
        story_id: u64,
        #[arg(long)]
        summary: String,
    },

    /// Delete a story's summary from both tiers
    Delete { story_id: u64 },

    /// List every live summary
    List,
}

fn print_summary(record: &StorySummary) {
    let stored = chrono::DateTime::from_timestamp_millis(record.timestamp)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| record.timestamp.to_string());
    println!("Story {} (stored {})", record.story_id, stored);
    println!("  {}", record.summary);
}

pub async fn summarize(state: &AppState, args: SummarizeArgs) -> Result<()> {
    match state
        .summary_service
        .get_or_create_summary(args.story_id, &args.url)
        .await
    {
        Ok(summary) => {
            println!("{}", summary);
            Ok(())
        }
        Err(e) => Err(anyhow!(
            "{} (HTTP {}, {})",
            e.user_message(),
            e.status_code(),
            e.kind()
        )),
    }
}

pub async fn cache(state: &AppState, command: CacheCommand) -> Result<()> {
    let server = state.summary_service.server_cache();
    match command {
        CacheCommand::Get { story_id } => match server.get(story_id).await? {
            Some(record) => print_summary(&record),
            None => println!("No live summary for story {}", story_id),
        },
        CacheCommand::Put { story_id, summary } => {
            let record = server.put(story_id, &summary).await?;
            let client = state.summary_service.client_cache().clone();
            let local = record.clone();
            run_blocking(move || client.store(&local)).await?;
            info!("Stored summary for story {}", story_id);
            print_summary(&record);
        }
        CacheCommand::Delete { story_id } => {
            server.delete(story_id).await?;
            let client = state.summary_service.client_cache().clone();
            run_blocking(move || client.delete(story_id)).await?;
            println!("Deleted summary for story {}", story_id);
        }
        CacheCommand::List => {
            let records = server.list_all().await?;
            println!("{} live summaries", records.len());
            for record in &records {
                print_summary(record);
            }
        }
    }
    Ok(())
}

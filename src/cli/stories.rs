// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::AppState;
use crate::hn::StoryType;

fn parse_story_type(raw: &str) -> Result<StoryType, String> {
    raw.parse()
}

/// Arguments for the stories command
#[derive(Args, Debug)]
pub struct StoriesArgs {
    /// top, best, new, ask, show or job
    #[arg(long = "type", default_value = "top", value_parser = parse_story_type)]
    pub story_type: StoryType,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long, default_value_t = 10)]
    pub per_page: usize,

    /// Case-insensitive search over title and author
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ReadCommand {
    /// Mark a story as read
    Mark { story_id: u64 },

    /// List read story ids
    List,
}

pub async fn list_stories(state: &AppState, args: StoriesArgs) -> Result<()> {
    let page = state
        .hn
        .get_stories(args.page, args.per_page, args.query.as_deref(), args.story_type)
        .await?;

    println!(
        "{} stories, page {}/{} ({} total)",
        page.story_type, page.current_page, page.total_pages, page.total
    );
    for story in &page.stories {
        let read = if state.read_stories.is_read(story.id)? { "*" } else { " " };
        println!("{} [{}] {} ({} points by {})", read, story.id, story.title, story.score, story.by);
        if let Some(url) = &story.url {
            println!("      {}", url);
        }
    }
    Ok(())
}

pub fn read(state: &AppState, command: ReadCommand) -> Result<()> {
    match command {
        ReadCommand::Mark { story_id } => {
            if state.read_stories.mark_as_read(story_id)? {
                println!("Marked story {} as read", story_id);
            } else {
                println!("Story {} was already read", story_id);
            }
        }
        ReadCommand::List => {
            for id in state.read_stories.read_stories()? {
                println!("{}", id);
            }
        }
    }
    Ok(())
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    #[default]
    Top,
    Best,
    New,
    Ask,
    Show,
    Job,
}

impl StoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Best => "best",
            Self::New => "new",
            Self::Ask => "ask",
            Self::Show => "show",
            Self::Job => "job",
        }
    }

    /// Id list endpoint, relative to the API base
    pub fn endpoint(&self) -> String {
        format!("{}stories.json", self.as_str())
    }

    /// Ask, show and job lists are much shorter upstream
    pub fn is_special(&self) -> bool {
        matches!(self, Self::Ask | Self::Show | Self::Job)
    }

    /// Ids to request for a given max item id
    pub fn fetch_limit(&self, max_item: u64) -> usize {
        let limit = if self.is_special() {
            (max_item / 500).min(200)
        } else {
            (max_item / 100).min(1000)
        };
        limit as usize
    }

    /// Whether a fetched item belongs in a page of this type
    pub fn accepts(&self, story: &Story) -> bool {
        match self {
            Self::Job => story.item_type == "job",
            Self::Ask => story.item_type == "story" && story.title.starts_with("Ask HN:"),
            Self::Show => story.item_type == "story" && story.title.starts_with("Show HN:"),
            _ => story.url.as_deref().is_some_and(|u| !u.is_empty()),
        }
    }
}

impl fmt::Display for StoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "best" => Ok(Self::Best),
            "new" => Ok(Self::New),
            "ask" => Ok(Self::Ask),
            "show" => Ok(Self::Show),
            "job" => Ok(Self::Job),
            other => Err(format!("unknown story type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Story {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub by: String,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub descendants: i64,
    #[serde(default)]
    pub kids: Vec<u64>,
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub dead: bool,
}

impl Story {
    /// Case-insensitive match on title or author; `needle` must be lowercase
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.by.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub by: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub kids: Vec<u64>,
    #[serde(default)]
    pub parent: u64,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub dead: bool,
    #[serde(rename = "type", default)]
    pub item_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub karma: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default)]
    pub submitted: Vec<u64>,
}

/// One page of stories
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoryPage {
    pub stories: Vec<Story>,
    pub total: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub story_type: StoryType,
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML text extraction
//!
//! Reduces a raw page to a bounded plain-text excerpt for the language
//! model. This is a pattern-based stripper, not a DOM parser: malformed
//! markup can leak or drop some text.

use regex::Regex;
use std::sync::OnceLock;

/// Block elements dropped together with their contents
const NOISE_TAGS: &[&str] = &["script", "style", "noscript", "nav", "header", "footer"];

struct Patterns {
    comments: Regex,
    blocks: Vec<Regex>,
    tags: Regex,
    entities: Regex,
    dangling: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        comments: Regex::new(r"(?s)<!--.*?-->").expect("valid comment pattern"),
        blocks: NOISE_TAGS
            .iter()
            .map(|tag| {
                Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>"))
                    .expect("valid block pattern")
            })
            .collect(),
        tags: Regex::new(r"<[^>]*>").expect("valid tag pattern"),
        entities: Regex::new(r"&(?:[a-zA-Z][a-zA-Z0-9]{1,31}|#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6});")
            .expect("valid entity pattern"),
        dangling: Regex::new(r"(?i)<\s*/?\s*(?:script|style)").expect("valid dangling pattern"),
    })
}

/// Extract readable text from HTML
///
/// # Arguments
/// * `html` - Raw HTML string
/// * `max_chars` - Maximum characters to return
///
/// # Returns
/// Plain text with noise blocks and tags removed, whitespace collapsed and
/// length capped at `max_chars` characters. Empty when nothing is left.
pub fn extract_text(html: &str, max_chars: usize) -> String {
    let p = patterns();

    let mut text = p.comments.replace_all(html, " ").into_owned();
    for block in &p.blocks {
        text = block.replace_all(&text, " ").into_owned();
    }
    let text = p.tags.replace_all(&text, " ");
    let text = p.entities.replace_all(&text, |caps: &regex::Captures| {
        decode_entity(&caps[0]).to_string()
    });
    // Unterminated tags survive the tag pass
    let text = p.dangling.replace_all(&text, " ");

    let cleaned = clean_text(&text);
    truncate_content(&cleaned, max_chars)
}

/// Keep the handful of entities that carry meaning in prose, drop the rest
fn decode_entity(entity: &str) -> &'static str {
    match entity {
        "&amp;" => "&",
        "&quot;" => "\"",
        "&#39;" | "&apos;" => "'",
        _ => " ",
    }
}

/// Clean text: normalize whitespace
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate content to `max_chars` characters, preferring a word boundary
fn truncate_content(text: &str, max_chars: usize) -> String {
    let cut = match text.char_indices().nth(max_chars) {
        Some((idx, _)) => idx,
        None => return text.to_string(),
    };

    let truncated = &text[..cut];
    if text[cut..].starts_with(' ') {
        return truncated.to_string();
    }
    match truncated.rfind(' ') {
        Some(last_space) if last_space > 0 => truncated[..last_space].to_string(),
        _ => truncated.to_string(),
    }
}

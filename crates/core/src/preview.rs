//! Dry-run preview of a segmented thread.

use serde::Serialize;

use crate::segmenter::char_len;

const RULE_WIDTH: usize = 50;

/// Position and size of one chunk, 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkStats {
    pub position: usize,
    pub characters: usize,
}

pub fn preview_stats(chunks: &[String]) -> Vec<ChunkStats> {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| ChunkStats {
            position: i + 1,
            characters: char_len(chunk),
        })
        .collect()
}

/// Render the human-readable preview printed before publishing.
pub fn format_preview(chunks: &[String]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = format!("Text will be split into {} tweet(s):\n{rule}\n", chunks.len());

    for (chunk, stats) in chunks.iter().zip(preview_stats(chunks)) {
        out.push_str(&format!(
            "\nTweet {}:\n{chunk}\nCharacters: {}\n{rule}\n",
            stats.position, stats.characters
        ));
    }

    out
}

//! Publisher trait: the abstraction over posting platforms.
//!
//! A Publisher takes one chunk of text and returns the identifier the
//! platform assigned to it. Threads are built by replying each chunk to the
//! identifier of the chunk before it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PublishError;

/// Platform-assigned identifier of a published post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub String);

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PostId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Result of publishing a single post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub success: bool,
    pub post_id: PostId,
    pub text: String,
    pub published_at: DateTime<Utc>,
}

impl PublishReceipt {
    pub fn new(post_id: PostId, text: impl Into<String>) -> Self {
        Self {
            success: true,
            post_id,
            text: text.into(),
            published_at: Utc::now(),
        }
    }
}

/// Result of publishing a whole thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadReceipt {
    pub success: bool,
    pub thread_length: usize,
    pub post_ids: Vec<PostId>,
    pub first_post_id: PostId,
    pub published_at: DateTime<Utc>,
}

impl ThreadReceipt {
    /// Build from the ids of every published chunk, in order. `None` when empty.
    pub fn from_ids(post_ids: Vec<PostId>) -> Option<Self> {
        let first_post_id = post_ids.first()?.clone();
        Some(Self {
            success: true,
            thread_length: post_ids.len(),
            post_ids,
            first_post_id,
            published_at: Utc::now(),
        })
    }
}

/// Either kind of receipt, serialized without a tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Published {
    Thread(ThreadReceipt),
    Single(PublishReceipt),
}

impl Published {
    /// Identifier of the first (or only) post.
    pub fn first_post_id(&self) -> &PostId {
        match self {
            Self::Single(receipt) => &receipt.post_id,
            Self::Thread(receipt) => &receipt.first_post_id,
        }
    }
}

/// The core Publisher trait.
///
/// Implementations handle platform-specific transport and authentication.
/// `publish` posts exactly one chunk; it never splits or retries.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Human-readable publisher name (e.g., "command", "console").
    fn name(&self) -> &str;

    /// Publish one chunk, optionally as a reply to an earlier post.
    async fn publish(
        &self,
        text: &str,
        in_reply_to: Option<&PostId>,
    ) -> std::result::Result<PostId, PublishError>;

    /// Health check: can this publisher reach its platform?
    async fn health_check(&self) -> std::result::Result<bool, PublishError> {
        Ok(true)
    }
}

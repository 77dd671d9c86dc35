//! In-memory publisher: records every post, optionally failing on demand.

use std::sync::Mutex;

use async_trait::async_trait;
use threadsmith_core::error::PublishError;
use threadsmith_core::publisher::{PostId, Publisher};

/// A post captured by [`MemoryPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPost {
    pub id: PostId,
    pub text: String,
    pub in_reply_to: Option<PostId>,
}

#[derive(Default)]
pub struct MemoryPublisher {
    posts: Mutex<Vec<RecordedPost>>,
    /// 1-indexed call number that should be rejected.
    fail_at: Option<usize>,
    calls: Mutex<usize>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the `position`-th publish call (1-indexed).
    pub fn fail_at(mut self, position: usize) -> Self {
        self.fail_at = Some(position);
        self
    }

    /// Snapshot of everything published so far.
    pub fn posts(&self) -> Vec<RecordedPost> {
        self.posts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    fn name(&self) -> &str {
        "memory"
    }

    async fn publish(
        &self,
        text: &str,
        in_reply_to: Option<&PostId>,
    ) -> Result<PostId, PublishError> {
        let call = {
            let mut calls = self
                .calls
                .lock()
                .map_err(|_| PublishError::Process("call counter poisoned".into()))?;
            *calls += 1;
            *calls
        };

        if self.fail_at == Some(call) {
            return Err(PublishError::Rejected(format!("injected failure on call {call}")));
        }

        let mut posts = self
            .posts
            .lock()
            .map_err(|_| PublishError::Process("post log poisoned".into()))?;
        let id = PostId(format!("mem-{}", posts.len() + 1));
        posts.push(RecordedPost {
            id: id.clone(),
            text: text.to_string(),
            in_reply_to: in_reply_to.cloned(),
        });
        Ok(id)
    }
}

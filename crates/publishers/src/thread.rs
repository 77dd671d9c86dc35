//! Thread publisher: posts a segmented thread as a chain of replies.
//!
//! The first chunk is posted on its own; every later chunk replies to the
//! chunk immediately before it. A failure part-way through leaves the
//! earlier posts live: there is no rollback and no retry, and the error
//! carries the ids that were already published.

use std::sync::Arc;

use threadsmith_core::error::PublishError;
use threadsmith_core::publisher::{PostId, PublishReceipt, Published, Publisher, ThreadReceipt};
use threadsmith_core::segmenter::{Segmenter, char_len};
use tracing::{info, warn};

pub struct ThreadPublisher {
    publisher: Arc<dyn Publisher>,
    segmenter: Segmenter,
}

impl ThreadPublisher {
    pub fn new(publisher: Arc<dyn Publisher>, segmenter: Segmenter) -> Self {
        Self {
            publisher,
            segmenter,
        }
    }

    /// Publish `text` as-is in a single post.
    pub async fn publish_single(&self, text: &str) -> Result<PublishReceipt, PublishError> {
        let id = self.publisher.publish(text, None).await?;
        info!(publisher = %self.publisher.name(), post_id = %id, "Published post");
        Ok(PublishReceipt::new(id, text))
    }

    /// Segment `text` and publish the result. A one-chunk result is a single post.
    pub async fn publish_thread(&self, text: &str) -> threadsmith_core::Result<Published> {
        let chunks = self.segmenter.segment(text)?;
        if let [only] = chunks.as_slice() {
            return Ok(Published::Single(self.publish_single(only).await?));
        }

        Ok(Published::Thread(self.publish_chunks(&chunks).await?))
    }

    /// Publish `text`, threading when forced or when it exceeds one unit.
    pub async fn publish_text(
        &self,
        text: &str,
        force_thread: bool,
    ) -> threadsmith_core::Result<Published> {
        self.segmenter.validate()?;
        if force_thread || char_len(text) > self.segmenter.max_unit_length() {
            self.publish_thread(text).await
        } else {
            if text.trim().is_empty() {
                return Err(threadsmith_core::SegmentError::EmptyInput.into());
            }
            Ok(Published::Single(self.publish_single(text).await?))
        }
    }

    /// Publish pre-segmented chunks as a reply chain.
    pub async fn publish_chunks(&self, chunks: &[String]) -> Result<ThreadReceipt, PublishError> {
        let total = chunks.len();
        let mut published: Vec<PostId> = Vec::with_capacity(total);

        for (i, chunk) in chunks.iter().enumerate() {
            let position = i + 1;
            let result = self.publisher.publish(chunk, published.last()).await;
            match result {
                Ok(id) => {
                    info!(position, total, post_id = %id, "Published thread post");
                    published.push(id);
                }
                Err(e) if published.is_empty() => return Err(e),
                Err(e) => {
                    warn!(
                        position,
                        total,
                        live = published.len(),
                        error = %e,
                        "Thread interrupted, earlier posts remain live"
                    );
                    return Err(PublishError::Partial {
                        published,
                        position,
                        reason: e.to_string(),
                    });
                }
            }
        }

        ThreadReceipt::from_ids(published)
            .ok_or_else(|| PublishError::InvalidResponse("no chunks to publish".into()))
    }
}

//! Console publisher: prints chunks instead of posting them.
//!
//! Used for `--dry-run`: the thread is assembled exactly as it would be
//! published, with locally generated ids standing in for platform ids.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use threadsmith_core::error::PublishError;
use threadsmith_core::publisher::{PostId, Publisher};

pub struct ConsolePublisher {
    counter: AtomicUsize,
}

impl ConsolePublisher {
    pub fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
        }
    }

    fn next_id(&self) -> PostId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        PostId(format!("local-{n}"))
    }
}

impl Default for ConsolePublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Publisher for ConsolePublisher {
    fn name(&self) -> &str {
        "console"
    }

    async fn publish(
        &self,
        text: &str,
        in_reply_to: Option<&PostId>,
    ) -> Result<PostId, PublishError> {
        let id = self.next_id();
        match in_reply_to {
            Some(parent) => println!("--- {id} (reply to {parent}) ---"),
            None => println!("--- {id} ---"),
        }
        println!("{text}");
        Ok(id)
    }
}

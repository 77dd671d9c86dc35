//! Publisher implementations for threadsmith.
//!
//! Each publisher posts one chunk at a time; [`ThreadPublisher`] turns a
//! segmented thread into a chain of replies on top of any of them.
//!
//! Available publishers:
//! - **Command**: hands each chunk to an external program
//! - **Console**: prints chunks for dry runs
//! - **Memory**: records chunks in memory, with failure injection

pub mod command;
pub mod console;
pub mod memory;
pub mod thread;

use std::sync::Arc;
use std::time::Duration;

use threadsmith_config::{AppConfig, PublisherKind};
use threadsmith_core::credentials::Credentials;
use threadsmith_core::error::PublishError;
use threadsmith_core::publisher::Publisher;
use tracing::debug;

pub use command::{CommandConfig, CommandPublisher, REPLY_TO_VAR};
pub use console::ConsolePublisher;
pub use memory::{MemoryPublisher, RecordedPost};
pub use thread::ThreadPublisher;

/// Build the publisher selected in `config`, handing it `credentials`.
pub fn build_from_config(
    config: &AppConfig,
    credentials: Credentials,
) -> Result<Arc<dyn Publisher>, PublishError> {
    let publisher: Arc<dyn Publisher> = match config.publisher.kind {
        PublisherKind::Console => Arc::new(ConsolePublisher::new()),
        PublisherKind::Command => {
            let program = config.publisher.program.clone().ok_or_else(|| {
                PublishError::NotConfigured(
                    "set publisher.program in config.toml to the command that posts one chunk"
                        .into(),
                )
            })?;
            let command = CommandConfig::new(program)
                .with_args(config.publisher.args.clone())
                .with_timeout(Duration::from_secs(config.publisher.timeout_secs));
            Arc::new(CommandPublisher::new(command, credentials))
        }
    };

    debug!(publisher = %publisher.name(), "Built publisher");
    Ok(publisher)
}

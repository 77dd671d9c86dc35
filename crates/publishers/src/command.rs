//! Command publisher: delegates each post to an external program.
//!
//! The program receives the chunk text on stdin, the reply target in
//! `THREADSMITH_REPLY_TO` (unset for the first post), and the four
//! `TWITTER_*` credentials as environment variables. The first non-empty
//! line it prints on stdout is taken as the new post's identifier.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use threadsmith_core::credentials::Credentials;
use threadsmith_core::error::PublishError;
use threadsmith_core::publisher::{PostId, Publisher};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Environment variable carrying the id of the post being replied to.
pub const REPLY_TO_VAR: &str = "THREADSMITH_REPLY_TO";

/// Command publisher configuration.
#[derive(Debug, Clone)]
pub struct CommandConfig {
    /// Executable name or path.
    pub program: String,
    /// Arguments passed on every invocation.
    pub args: Vec<String>,
    /// Kill the program if it runs longer than this.
    pub timeout: Duration,
}

impl CommandConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct CommandPublisher {
    config: CommandConfig,
    credentials: Credentials,
}

impl CommandPublisher {
    pub fn new(config: CommandConfig, credentials: Credentials) -> Self {
        Self {
            config,
            credentials,
        }
    }

    fn command(&self, in_reply_to: Option<&PostId>) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        for (name, value) in self.credentials.env_pairs() {
            cmd.env(name, value);
        }

        match in_reply_to {
            Some(id) => cmd.env(REPLY_TO_VAR, &id.0),
            None => cmd.env_remove(REPLY_TO_VAR),
        };

        cmd
    }
}

#[async_trait]
impl Publisher for CommandPublisher {
    fn name(&self) -> &str {
        "command"
    }

    async fn publish(
        &self,
        text: &str,
        in_reply_to: Option<&PostId>,
    ) -> Result<PostId, PublishError> {
        let program = &self.config.program;
        debug!(program = %program, reply_to = ?in_reply_to, chars = text.chars().count(), "Publishing via command");

        let mut child = self
            .command(in_reply_to)
            .spawn()
            .map_err(|e| PublishError::Process(format!("failed to start '{program}': {e}")))?;

        // The stdin write runs under the timeout as well.
        let run = async move {
            if let Some(mut stdin) = child.stdin.take() {
                // A program that exits without reading stdin closes the pipe early;
                // its exit status decides the outcome.
                if let Err(e) = stdin.write_all(text.as_bytes()).await {
                    if e.kind() != std::io::ErrorKind::BrokenPipe {
                        return Err(PublishError::Process(format!(
                            "failed to write to '{program}': {e}"
                        )));
                    }
                }
            }

            child
                .wait_with_output()
                .await
                .map_err(|e| PublishError::Process(format!("'{program}' failed: {e}")))
        };

        let secs = self.config.timeout.as_secs();
        let output = tokio::time::timeout(self.config.timeout, run)
            .await
            .map_err(|_| PublishError::Process(format!("'{program}' timed out after {secs}s")))??;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(program = %program, exit_code = code, "Publish command failed");
            return Err(PublishError::Rejected(format!("exit code {code}: {stderr}")));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(PostId::from)
            .ok_or_else(|| {
                PublishError::InvalidResponse(format!("'{program}' printed no post id"))
            })
    }

    async fn health_check(&self) -> Result<bool, PublishError> {
        Ok(which::which(&self.config.program).is_ok())
    }
}

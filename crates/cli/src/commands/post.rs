//! `threadsmith post`: Publish text as a single post or a numbered thread.

use std::sync::Arc;

use clap::Args;
use threadsmith_config::CredentialsConfig;
use threadsmith_core::{CredentialSource, Publisher, Segmenter, format_preview};
use threadsmith_publishers::{ConsolePublisher, ThreadPublisher, build_from_config};
use tracing::debug;

use super::{load_config, read_text_arg};

#[derive(Args, Debug)]
pub struct PostArgs {
    /// Text to publish, or @path to read it from a file
    #[arg(short, long)]
    pub text: String,

    /// Publish as a thread even when the text fits in one post
    #[arg(long)]
    pub thread: bool,

    /// Show how the text would be split, then exit
    #[arg(long)]
    pub preview: bool,

    /// Print the posts instead of publishing them
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum characters per post
    #[arg(long, value_name = "N")]
    pub max_length: Option<usize>,

    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub api_secret: Option<String>,

    #[arg(long)]
    pub access_token: Option<String>,

    #[arg(long)]
    pub access_token_secret: Option<String>,
}

impl PostArgs {
    fn credential_overrides(&self) -> CredentialsConfig {
        CredentialsConfig {
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
            access_token: self.access_token.clone(),
            access_token_secret: self.access_token_secret.clone(),
        }
    }
}

pub async fn run(args: PostArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let text = read_text_arg(&args.text)?;
    let segmenter = Segmenter::new(args.max_length.unwrap_or(config.thread.max_unit_length));
    segmenter.validate()?;

    if args.preview {
        let chunks = segmenter.segment(&text)?;
        print!("{}", format_preview(&chunks));
        return Ok(());
    }

    let publisher: Arc<dyn Publisher> = if args.dry_run {
        Arc::new(ConsolePublisher::new())
    } else {
        let credentials = config
            .credentials
            .merged_with(&args.credential_overrides())
            .credentials()?;
        build_from_config(&config, credentials)?
    };
    debug!(publisher = %publisher.name(), dry_run = args.dry_run, "Publishing");

    let published = ThreadPublisher::new(publisher, segmenter)
        .publish_text(&text, args.thread)
        .await?;

    println!("{}", serde_json::to_string_pretty(&published)?);
    Ok(())
}

//! threadsmith CLI: the main entry point.
//!
//! Commands:
//! - `post`: Publish text as a single post or a numbered thread
//! - `preview`: Show how text would be split, without publishing
//! - `render`: Render a Mermaid diagram to an image
//! - `credentials`: Interactive credential setup
//! - `config`: Show, locate, or validate configuration
//! - `doctor`: Diagnose system health

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "threadsmith",
    about = "threadsmith: split long text into numbered threads and publish them",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish text as a single post or a numbered thread
    Post(commands::post::PostArgs),

    /// Show how text would be split into a thread
    Preview {
        /// Text to split, or @path to read it from a file
        text: String,

        /// Maximum characters per post
        #[arg(long, value_name = "N")]
        max_length: Option<usize>,
    },

    /// Render a Mermaid diagram to an image
    Render(commands::render::RenderArgs),

    /// Set up publishing credentials interactively
    Credentials,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Diagnose system health
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Check the configuration for problems
    Validate,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Post(args) => commands::post::run(args).await,
        Commands::Preview { text, max_length } => commands::preview::run(text, max_length).await,
        Commands::Render(args) => commands::render::run(args).await,
        Commands::Credentials => commands::credentials::run().await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await,
            ConfigAction::Path => commands::config_cmd::path().await,
            ConfigAction::Validate => commands::config_cmd::validate().await,
        },
        Commands::Doctor => commands::doctor::run().await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

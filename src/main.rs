//! # Snippet Summarizer CLI (`snip`)
//!
//! The `snip` binary runs the REST server and exposes the same snippet
//! operations on the command line.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `snip init` | Create the SQLite database and run schema migrations |
//! | `snip serve` | Start the REST server |
//! | `snip create "<text>"` | Summarize and store a snippet |
//! | `snip list` | List stored snippets |
//! | `snip get <id>` | Show one snippet |
//! | `snip health` | Report database and provider status |
//!
//! Logs go to stderr; filter them with `RUST_LOG`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snippet_summarizer::app::App;
use snippet_summarizer::{commands, config, migrate, server};

/// Snippet Summarizer — store text snippets with AI-generated summaries.
///
/// Settings come from built-in defaults, an optional TOML file, and
/// environment variables (a `.env` file in the working directory is loaded
/// first). The provider credential is read from `ANTHROPIC_API_KEY`.
#[derive(Parser)]
#[command(
    name = "snip",
    about = "Snippet Summarizer — store text snippets with AI-generated summaries",
    version
)]
struct Cli {
    /// Path to a configuration file (TOML). Optional.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent — running it multiple times is safe.
    Init,

    /// Start the REST server on `[server].bind` (or `PORT`).
    Serve,

    /// Summarize a text and store it as a snippet.
    Create {
        /// Snippet text, at least 30 characters.
        text: String,
    },

    /// List all snippets.
    List,

    /// Show a snippet by id.
    Get {
        /// Snippet UUID.
        id: String,
    },

    /// Report database and summarization provider status.
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("snippet_summarizer=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;

    if let Commands::Init = cli.command {
        migrate::run_migrations(&cfg).await?;
        println!("Database initialized successfully.");
        return Ok(());
    }

    let app = App::open(&cfg).await?;

    let result = match cli.command {
        Commands::Init => Ok(()),
        Commands::Serve => server::run_server(&cfg, app.service.clone()).await,
        Commands::Create { text } => commands::run_create(&app.service, &text).await,
        Commands::List => commands::run_list(&app.service).await,
        Commands::Get { id } => commands::run_get(&app.service, &id).await,
        Commands::Health => commands::run_health(&app.service).await,
    };

    app.close().await;
    result
}

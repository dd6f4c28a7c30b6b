//! MirrorMind CLI — the main entry point.
//!
//! Commands:
//! - `onboard`     — Initialize config & journal directory
//! - `contemplate` — Run a one-shot recursion from the terminal
//! - `chat`        — Interactive chat mode (!think / !mode / !modes)
//! - `gateway`     — Start the HTTP API server
//! - `daemon`      — Start gateway + chat channels together
//! - `status`      — Show resolved configuration and provider health
//! - `modes`       — Print the mode table

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "mirrormind",
    about = "MirrorMind — recursive self-dialogue runtime for local LLMs",
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
    /// Initialize configuration and journal directory
    Onboard,

    /// Run a single recursive contemplation and print the sequence
    Contemplate {
        /// The seed thought to begin recursion
        #[arg(short, long)]
        prompt: String,

        /// Recursion depth (defaults to the configured depth)
        #[arg(short, long)]
        depth: Option<u32>,

        /// Thinking mode
        #[arg(short, long, default_value = "standard")]
        mode: String,
    },

    /// Interactive chat mode in the terminal
    Chat,

    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Start the full daemon (gateway + chat channels)
    Daemon,

    /// Show resolved configuration and provider health
    Status,

    /// List available thinking modes
    Modes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Contemplate {
            prompt,
            depth,
            mode,
        } => commands::contemplate::run(prompt, depth, mode).await?,
        Commands::Chat => commands::chat::run().await?,
        Commands::Gateway { port } => commands::gateway::run(port).await?,
        Commands::Daemon => commands::daemon::run().await?,
        Commands::Status => commands::status::run().await?,
        Commands::Modes => commands::modes::run().await?,
    }

    Ok(())
}

//! userdesk CLI - users REST API and HTML views
//!
//! Subcommands:
//! - `serve`: run the HTTP server
//! - `check`: verify the database connection

use anyhow::Result;
use clap::{Parser, Subcommand};

mod config;
mod server;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "userdesk",
    author,
    version,
    about = "Users REST API and HTML views over a SQL database"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server (JSON API under /api, pages under /usuarios)
    Serve(server::ServeArgs),
    /// Connect to the database and report the number of users
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig { debug: cli.debug })?;
    for path in &loaded {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Serve(args) => server::run_serve(args).await,
        Commands::Check => server::run_check().await,
    }
}

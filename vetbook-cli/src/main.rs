//! vetbook CLI - veterinary appointment-booking backend
//!
//! `vetbook serve` connects to PostgreSQL, runs migrations, and starts the
//! HTTP API.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod server;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(name = "vetbook", version, about = "Veterinary appointment-booking backend")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server
    Serve(server::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap resolves env-backed arguments
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_setup::init_tracing(&TracingConfig { debug: cli.debug })?;

    match cli.command {
        Command::Serve(args) => server::run(args).await,
    }
}

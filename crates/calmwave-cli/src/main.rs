//! CLI entry point - the composition root.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use calmwave_cli::{Cli, Commands, handlers};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads env-backed arguments
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve(args) => handlers::serve::execute(&args).await,
        Commands::Generate(args) => handlers::generate::execute(&args).await,
    }
}

//! Root CLI structure with global options.

use clap::Parser;

use crate::commands::Commands;

/// Personalised guided meditations from a single prompt.
#[derive(Parser)]
#[command(name = "calmwave")]
#[command(about = "Generate guided meditation audio")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

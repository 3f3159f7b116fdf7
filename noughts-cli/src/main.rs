//! NOUGHTS CLI - Command-line interface
//!
//! Commands:
//! - play: Play against the computer in the terminal
//! - serve: Start the HTTP API
//! - bench: Measure the heuristic against a random opponent

mod bench;
mod play;
mod server;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use noughts_core::SessionConfig;

#[derive(Parser)]
#[command(name = "noughts")]
#[command(about = "Tic-tac-toe against a win/block/random computer opponent")]
struct Cli {
    /// Random seed for the computer opponent
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Session settings (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a session in the terminal
    Play(play::PlayArgs),
    /// Start the HTTP API
    Serve(server::ServerArgs),
    /// Play the heuristic against a random opponent
    Bench(bench::BenchArgs),
}

fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the board
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.seed)?;

    match cli.command {
        Commands::Play(args) => play::run(args, config),
        Commands::Serve(args) => server::run(args, config),
        Commands::Bench(args) => bench::run(args, config),
    }
}

/// Session settings from file (if any) with the command-line seed applied
fn load_config(path: Option<&std::path::Path>, seed: Option<u64>) -> Result<SessionConfig> {
    let mut config = match path {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

//! Serve command - start the HTTP API
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), start_server()
//! - Level 3: (delegated to noughts-server crate)

use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use noughts_core::SessionConfig;
use noughts_server::{run_server, ServerConfig, ServerState, DEFAULT_MAX_SESSIONS};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8003")]
    pub port: u16,

    /// Reject cross-origin browser requests
    #[arg(long)]
    pub same_origin_only: bool,

    /// Live sessions allowed at once
    #[arg(long, default_value_t = DEFAULT_MAX_SESSIONS)]
    pub max_sessions: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run serve command
pub fn run(args: ServerArgs, defaults: SessionConfig) -> Result<()> {
    if args.max_sessions == 0 {
        anyhow::bail!("--max-sessions must be at least 1");
    }
    let config = configure_server(&args);

    tracing::info!(
        "Starting NOUGHTS server on port {} (up to {} sessions)",
        config.port,
        args.max_sessions
    );
    if defaults.seed.is_some() {
        tracing::warn!("Fixed seed applies to every session; computer play will repeat");
    }

    let state = ServerState::with_defaults(defaults).with_max_sessions(args.max_sessions);
    start_server(config, state)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn configure_server(args: &ServerArgs) -> ServerConfig {
    ServerConfig {
        port: args.port,
        allow_any_origin: !args.same_origin_only,
    }
}

/// Start the server (blocking)
fn start_server(config: ServerConfig, state: ServerState) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let state = Arc::new(state);

    runtime.block_on(async { run_server(config, state).await })
}

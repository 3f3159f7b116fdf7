//! Example to run the NOUGHTS server standalone
//!
//! Run with: cargo run -p noughts-server --example run_server

use std::sync::Arc;

use noughts_server::{run_server, ServerConfig, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ServerConfig::default();

    println!("Starting NOUGHTS server on port {}", config.port);
    println!("Create a game with: curl -X POST -H 'content-type: application/json' -d '{{}}' http://localhost:{}/api/games", config.port);

    run_server(config, Arc::new(ServerState::new())).await
}

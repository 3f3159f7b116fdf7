//! NOUGHTS Server - HTTP API for game sessions
//!
//! This crate provides the web backend:
//! - REST API for creating and playing sessions
//! - One isolated game and scoreboard per session
//! - Two-phase turns: the client decides when to request the computer's reply
//!
//! Errors are JSON `{ "error": ... }` bodies: 404 for an unknown game, 400 for
//! a malformed body, 503 once the session limit is reached.

mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use state::{ServerState, DEFAULT_MAX_SESSIONS};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Allow browser front ends served from any origin
    pub allow_any_origin: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8003,
            allow_any_origin: true,
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let router = Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Sessions
        .route("/api/games", post(routes::games::create_game))
        .route(
            "/api/games/{id}",
            get(routes::games::get_game).delete(routes::games::delete_game),
        )
        // Turns
        .route("/api/games/{id}/move", post(routes::games::human_move))
        .route(
            "/api/games/{id}/computer-move",
            post(routes::games::computer_move),
        )
        // Rounds and resets
        .route("/api/games/{id}/round", post(routes::games::new_round))
        .route("/api/games/{id}/reset", post(routes::games::reset_game))
        // Scores
        .route(
            "/api/games/{id}/score",
            get(routes::scores::get_score).delete(routes::scores::reset_score),
        )
        // Shared state
        .with_state(state);

    if config.allow_any_origin {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig, state: Arc<ServerState>) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let router = create_router(&config, state);

    tracing::info!("NOUGHTS Server starting on http://0.0.0.0:{}", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

//! Scoreboard endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use noughts_core::{ScoreBoard, Session};
use std::sync::Arc;

use super::games::{update, GameView};
use super::ApiError;
use crate::state::ServerState;

pub async fn get_score(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<ScoreBoard>, ApiError> {
    state
        .with_session(&id, |session| session.current_score())
        .map(Json)
        .ok_or(ApiError::UnknownGame(id))
}

/// Zero the scores; the board is untouched
pub async fn reset_score(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    update(&state, id, Session::reset_scores)
}

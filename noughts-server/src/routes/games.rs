//! Game session endpoints
//!
//! A human move answers immediately. When the computer is due to reply the
//! response carries a ticket and the suggested delay; the client posts the
//! ticket back to `/computer-move` once it has waited.
//!
//! Malformed bodies are answered with 400 and a JSON error. Move indices that
//! parse but fall off the board are ordinary rejected moves.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use noughts_core::{
    Cell, ComputerTurnTicket, DisplayNames, GameResult, Phase, Player, ResetPolicy, ScoreBoard,
    Session, TurnReport,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::ApiError;
use crate::state::ServerState;

/// Snapshot of one session
#[derive(Serialize)]
pub struct GameView {
    pub id: String,
    pub round: u64,
    pub cells: [Cell; 9],
    pub current_player: Player,
    pub phase: Phase,
    pub result: GameResult,
    pub winning_line: Option<[usize; 3]>,
    pub score: ScoreBoard,
    pub names: DisplayNames,
    pub reset_policy: ResetPolicy,
    pub computer_turn: Option<ComputerTurnTicket>,
    pub computer_delay_ms: u64,
    pub reset_delay_ms: u64,
}

impl GameView {
    fn of(id: &str, session: &Session) -> Self {
        let game = session.game();
        let config = session.config();
        Self {
            id: id.to_string(),
            round: session.round(),
            cells: *game.board().cells(),
            current_player: game.current_player(),
            phase: game.phase(),
            result: game.result(),
            winning_line: game.board().winning_line(),
            score: session.current_score(),
            names: config.names.clone(),
            reset_policy: config.reset_policy,
            computer_turn: session.computer_ticket(),
            computer_delay_ms: config.computer_delay_ms,
            reset_delay_ms: config.reset_delay_ms,
        }
    }
}

#[derive(Serialize)]
pub struct TurnResponse {
    pub turn: TurnReport,
    pub game: GameView,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateGameRequest {
    pub names: Option<DisplayNames>,
    pub reset_policy: Option<ResetPolicy>,
    pub seed: Option<u64>,
}

#[derive(Deserialize)]
pub struct MoveRequest {
    /// Signed so that negative cells are reported as off the board
    pub index: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ComputerMoveRequest {
    /// Ticket from the human move; omitted means "reply now if due"
    pub ticket: Option<ComputerTurnTicket>,
}

/// Start a new session
pub async fn create_game(
    State(state): State<Arc<ServerState>>,
    body: Result<Json<CreateGameRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GameView>), ApiError> {
    let Json(req) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let mut config = state.defaults.clone();
    if let Some(names) = req.names {
        config.names = names;
    }
    if let Some(policy) = req.reset_policy {
        config.reset_policy = policy;
    }
    if let Some(seed) = req.seed {
        config.seed = Some(seed);
    }

    let session = Session::new(config);
    let view = GameView::of("", &session);
    let id = state
        .insert(session)
        .ok_or(ApiError::TooManyGames(state.max_sessions()))?;
    tracing::info!("Created {}", id);

    Ok((StatusCode::CREATED, Json(GameView { id, ..view })))
}

pub async fn get_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    state
        .with_session(&id, |session| GameView::of(&id, session))
        .map(Json)
        .ok_or(ApiError::UnknownGame(id))
}

pub async fn delete_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(ApiError::UnknownGame(id))
}

/// Apply the human's move
pub async fn human_move(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<TurnResponse>, ApiError> {
    let req = request_body(&state, &id, body)?;
    turn(&state, id, |session| session.human_move_checked(req.index))
}

/// Let the computer reply
pub async fn computer_move(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    body: Result<Json<ComputerMoveRequest>, JsonRejection>,
) -> Result<Json<TurnResponse>, ApiError> {
    let req = request_body(&state, &id, body)?;
    turn(&state, id, |session| match req.ticket {
        Some(ticket) => session.computer_move(ticket),
        None => session.computer_move_now(),
    })
}

/// Clear the board, keep the scores
pub async fn new_round(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    update(&state, id, Session::new_round)
}

/// Clear the board and the scores
pub async fn reset_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    update(&state, id, Session::reset)
}

/// Unwrap a JSON body; an unknown game wins over a bad body
fn request_body<T>(
    state: &ServerState,
    id: &str,
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    match body {
        Ok(Json(req)) => Ok(req),
        Err(_) if !state.contains(id) => Err(ApiError::UnknownGame(id.to_string())),
        Err(rejection) => {
            tracing::debug!("Bad request body for {}: {}", id, rejection.body_text());
            Err(ApiError::BadRequest(rejection.body_text()))
        }
    }
}

fn turn(
    state: &ServerState,
    id: String,
    f: impl FnOnce(&mut Session) -> TurnReport,
) -> Result<Json<TurnResponse>, ApiError> {
    state
        .with_session(&id, |session| {
            let turn = f(session);
            TurnResponse {
                turn,
                game: GameView::of(&id, session),
            }
        })
        .map(Json)
        .ok_or(ApiError::UnknownGame(id))
}

pub(super) fn update(
    state: &ServerState,
    id: String,
    f: impl FnOnce(&mut Session),
) -> Result<Json<GameView>, ApiError> {
    state
        .with_session(&id, |session| {
            f(session);
            GameView::of(&id, session)
        })
        .map(Json)
        .ok_or(ApiError::UnknownGame(id))
}

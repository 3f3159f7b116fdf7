//! NOUGHTS Core - Game engine and computer opponent
//!
//! This crate provides the core game logic for NOUGHTS:
//! - 3x3 board with occupancy and win/draw detection
//! - Game state and move application
//! - Win > block > random heuristic opponent
//! - Scoreboard with milestone tracking
//! - Session controller with deferred computer turns

pub mod board;
pub mod engine;
pub mod ai;
pub mod score;
pub mod config;
pub mod session;

// Re-exports for convenient access
pub use board::{Board, BoardError, Cell, Player, CELL_COUNT, WIN_PATTERNS};
pub use engine::{apply_move, computer_turn, new_game, GameResult, GameState, MoveOutcome, Phase, Rejection};
pub use ai::{HeuristicAI, MoveChoice, Reason};
pub use score::{Milestone, ScoreBoard};
pub use config::{DisplayNames, ResetPolicy, SessionConfig};
pub use session::{ComputerTurnTicket, Session, TurnReport};

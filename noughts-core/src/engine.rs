//! Game state and move application
//!
//! The engine is synchronous and delay-agnostic: `apply_move` returns as soon
//! as the mark is placed, and the caller decides when to run `computer_turn`.

use crate::ai::{HeuristicAI, Reason};
use crate::board::{Board, BoardError, Player};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    Won(Player),
    Draw,
}

/// Whose move the engine is waiting for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    AwaitingHumanMove,
    AwaitingComputerMove,
    Terminal,
}

/// Why a move was ignored
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize)]
pub enum Rejection {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("the game is already over")]
    GameOver,
    #[error("it is not {0}'s turn")]
    OutOfTurn(Player),
    #[error("the scheduled turn belongs to an earlier position")]
    Stale,
}

/// Result of a move attempt. Rejected attempts leave the game untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub accepted: bool,
    pub player: Player,
    pub index: Option<usize>,
    pub winner: Option<Player>,
    pub winning_line: Option<[usize; 3]>,
    pub draw: bool,
    /// Heuristic rule behind a computer move
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<Reason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<Rejection>,
}

impl MoveOutcome {
    pub fn rejected(player: Player, index: Option<usize>, rejection: Rejection) -> Self {
        Self {
            accepted: false,
            player,
            index,
            winner: None,
            winning_line: None,
            draw: false,
            reason: None,
            rejection: Some(rejection),
        }
    }

    /// True when this move ended the game
    pub fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.draw
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Board plus turn bookkeeping
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    current_player: Player,
    result: GameResult,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            result: GameResult::Ongoing,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn is_over(&self) -> bool {
        self.result != GameResult::Ongoing
    }

    pub fn phase(&self) -> Phase {
        match (self.result, self.current_player) {
            (GameResult::Ongoing, Player::X) => Phase::AwaitingHumanMove,
            (GameResult::Ongoing, Player::O) => Phase::AwaitingComputerMove,
            _ => Phase::Terminal,
        }
    }

    /// Empty board, X to move
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// Fresh game with X to move
pub fn new_game() -> GameState {
    GameState::new()
}

/// Place `player`'s mark at `index`.
///
/// Moves after the game ended, out of turn, off the board or onto an occupied
/// cell are ignored and reported with `accepted == false`.
pub fn apply_move(state: &mut GameState, index: usize, player: Player) -> MoveOutcome {
    if state.is_over() {
        return reject(player, Some(index), Rejection::GameOver);
    }
    if state.current_player != player {
        return reject(player, Some(index), Rejection::OutOfTurn(player));
    }
    if let Err(err) = state.board.set(index, player) {
        return reject(player, Some(index), err.into());
    }

    let mut outcome = MoveOutcome {
        accepted: true,
        player,
        index: Some(index),
        winner: None,
        winning_line: None,
        draw: false,
        reason: None,
        rejection: None,
    };

    if let Some(line) = state.board.winning_line() {
        state.result = GameResult::Won(player);
        outcome.winner = Some(player);
        outcome.winning_line = Some(line);
        tracing::debug!("{} completes line {:?}", player, line);
    } else if state.board.is_full() {
        state.result = GameResult::Draw;
        outcome.draw = true;
        tracing::debug!("board full, draw");
    } else {
        state.current_player = player.opponent();
    }

    outcome
}

/// Let the heuristic opponent move for O.
///
/// No-op unless the game is ongoing and it is O's turn.
pub fn computer_turn(state: &mut GameState, ai: &mut HeuristicAI) -> MoveOutcome {
    if state.is_over() {
        return reject(Player::O, None, Rejection::GameOver);
    }
    if state.current_player != Player::O {
        return reject(Player::O, None, Rejection::OutOfTurn(Player::O));
    }

    // A non-terminal state always has an empty cell
    let Some(choice) = ai.choose_move(&state.board, Player::O) else {
        return reject(Player::O, None, Rejection::GameOver);
    };

    let mut outcome = apply_move(state, choice.index, Player::O);
    outcome.reason = Some(choice.reason);
    outcome
}

fn reject(player: Player, index: Option<usize>, rejection: Rejection) -> MoveOutcome {
    tracing::debug!("ignoring move by {} at {:?}: {}", player, index, rejection);
    MoveOutcome::rejected(player, index, rejection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    /// Drive a sequence of alternating moves starting with X
    fn play(moves: &[usize]) -> (GameState, MoveOutcome) {
        let mut state = new_game();
        let mut last = None;
        for &index in moves {
            let player = state.current_player();
            let outcome = apply_move(&mut state, index, player);
            assert!(outcome.accepted, "move {} rejected", index);
            last = Some(outcome);
        }
        (state, last.unwrap())
    }

    #[test]
    fn test_new_game() {
        let state = new_game();
        assert_eq!(state.current_player(), Player::X);
        assert_eq!(state.phase(), Phase::AwaitingHumanMove);
        assert_eq!(state.board().mark_count(), 0);
    }

    #[test]
    fn test_turn_passes_to_computer() {
        let mut state = new_game();
        let outcome = apply_move(&mut state, 4, Player::X);
        assert!(outcome.accepted);
        assert!(!outcome.is_terminal());
        assert_eq!(state.phase(), Phase::AwaitingComputerMove);
    }

    #[test]
    fn test_occupied_cell_rejected() {
        let mut state = new_game();
        apply_move(&mut state, 4, Player::X);
        let before = state;
        let outcome = apply_move(&mut state, 4, Player::O);
        assert!(!outcome.accepted);
        assert_eq!(outcome.rejection, Some(Rejection::Board(BoardError::Occupied(4))));
        assert_eq!(state, before);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut state = new_game();
        let outcome = apply_move(&mut state, 9, Player::X);
        assert!(!outcome.accepted);
        assert_eq!(
            outcome.rejection,
            Some(Rejection::Board(BoardError::IndexOutOfRange(9)))
        );
        assert_eq!(state, new_game());
    }

    #[test]
    fn test_out_of_turn_rejected() {
        let mut state = new_game();
        let outcome = apply_move(&mut state, 0, Player::O);
        assert_eq!(outcome.rejection, Some(Rejection::OutOfTurn(Player::O)));
        assert_eq!(state.board().get(0), Ok(Cell::Empty));
    }

    #[test]
    fn test_win_is_terminal() {
        // X: 0, 1, 2   O: 3, 4
        let (state, outcome) = play(&[0, 3, 1, 4, 2]);
        assert_eq!(outcome.winner, Some(Player::X));
        assert_eq!(outcome.winning_line, Some([0, 1, 2]));
        assert!(!outcome.draw);
        assert_eq!(state.result(), GameResult::Won(Player::X));
        assert_eq!(state.phase(), Phase::Terminal);
    }

    #[test]
    fn test_draw_after_nine_moves() {
        // Final board: X O X / X O O / O X X
        let (state, outcome) = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert!(outcome.draw);
        assert_eq!(outcome.winner, None);
        assert!(state.board().is_full());
        assert_eq!(state.result(), GameResult::Draw);
    }

    #[test]
    fn test_no_moves_after_terminal() {
        let (mut state, _) = play(&[0, 3, 1, 4, 2]);
        let before = state;
        let outcome = apply_move(&mut state, 8, Player::X);
        assert_eq!(outcome.rejection, Some(Rejection::GameOver));
        let mut ai = HeuristicAI::with_seed(1);
        let outcome = computer_turn(&mut state, &mut ai);
        assert_eq!(outcome.rejection, Some(Rejection::GameOver));
        assert_eq!(state, before);
    }

    #[test]
    fn test_computer_turn_requires_o_to_move() {
        let mut state = new_game();
        let mut ai = HeuristicAI::with_seed(1);
        let outcome = computer_turn(&mut state, &mut ai);
        assert!(!outcome.accepted);
        assert_eq!(state, new_game());
    }

    #[test]
    fn test_computer_takes_win() {
        // X: 3, 4, 8   O: 0, 1
        let (mut state, _) = play(&[3, 0, 4, 1, 8]);
        let mut ai = HeuristicAI::with_seed(1);
        let outcome = computer_turn(&mut state, &mut ai);
        assert_eq!(outcome.index, Some(2));
        assert_eq!(outcome.reason, Some(Reason::Win));
        assert_eq!(outcome.winner, Some(Player::O));
        assert_eq!(state.result(), GameResult::Won(Player::O));
    }

    #[test]
    fn test_computer_blocks() {
        let (mut state, _) = play(&[0, 4, 1]);
        let mut ai = HeuristicAI::with_seed(1);
        let outcome = computer_turn(&mut state, &mut ai);
        assert_eq!(outcome.index, Some(2));
        assert_eq!(outcome.reason, Some(Reason::Block));
        assert_eq!(state.phase(), Phase::AwaitingHumanMove);
    }

    #[test]
    fn test_reset() {
        let (mut state, _) = play(&[0, 3, 1, 4, 2]);
        state.reset();
        assert_eq!(state, new_game());
    }
}

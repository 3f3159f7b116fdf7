//! Heuristic computer opponent
//!
//! Move priority is fixed: complete a line, otherwise block the opponent's
//! line, otherwise pick uniformly among the empty cells. Win and block scan
//! cells in increasing index order and take the first hit.

use crate::board::{Board, Player};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Why a cell was chosen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reason {
    Win,
    Block,
    Random,
}

/// A selected cell and the rule that selected it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveChoice {
    pub index: usize,
    pub reason: Reason,
}

/// Win > block > random opponent
#[derive(Clone, Debug)]
pub struct HeuristicAI {
    rng: ChaCha8Rng,
}

impl HeuristicAI {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Pick a cell for `player`, or None when the board is full
    pub fn choose_move(&mut self, board: &Board, player: Player) -> Option<MoveChoice> {
        let choice = if let Some(index) = winning_move(board, player) {
            MoveChoice { index, reason: Reason::Win }
        } else if let Some(index) = blocking_move(board, player) {
            MoveChoice { index, reason: Reason::Block }
        } else {
            let index = random_move(board, &mut self.rng)?;
            MoveChoice { index, reason: Reason::Random }
        };

        tracing::debug!(
            "{} chooses cell {} ({:?})",
            player,
            choice.index,
            choice.reason
        );
        Some(choice)
    }
}

impl Default for HeuristicAI {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowest empty cell where `player` would complete a line
pub fn winning_move(board: &Board, player: Player) -> Option<usize> {
    board.empty_cells().find(|&index| {
        board
            .with_mark(index, player)
            .map(|next| next.winner() == Some(player))
            .unwrap_or(false)
    })
}

/// Lowest empty cell the opponent would complete a line with next turn
pub fn blocking_move(board: &Board, player: Player) -> Option<usize> {
    winning_move(board, player.opponent())
}

/// Uniform choice among empty cells
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    let available: Vec<usize> = board.empty_cells().collect();
    available.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(layout: &str) -> Board {
        layout.parse().unwrap()
    }

    #[test]
    fn test_win_beats_block() {
        // O O _ / X X _ / _ _ _
        let b = board("OO_ XX_ ___");
        let mut ai = HeuristicAI::with_seed(7);
        let choice = ai.choose_move(&b, Player::O).unwrap();
        assert_eq!(choice, MoveChoice { index: 2, reason: Reason::Win });
    }

    #[test]
    fn test_blocks_threat() {
        let b = board("XX_ ___ ___");
        let mut ai = HeuristicAI::with_seed(7);
        let choice = ai.choose_move(&b, Player::O).unwrap();
        assert_eq!(choice, MoveChoice { index: 2, reason: Reason::Block });
    }

    #[test]
    fn test_first_winning_cell_is_taken() {
        // O can win at 2 (top row) or 6 (left column); lowest index wins
        let b = board("OO_ OXX _X_");
        assert_eq!(winning_move(&b, Player::O), Some(2));
    }

    #[test]
    fn test_first_blocking_cell_is_taken() {
        // X threatens 2 (top row), 7 (middle column) and 8 (diagonal)
        let b = board("XX_ OX_ O__");
        assert_eq!(winning_move(&b, Player::O), None);
        assert_eq!(blocking_move(&b, Player::O), Some(2));
    }

    #[test]
    fn test_lookahead_does_not_touch_board() {
        let b = board("OO_ XX_ ___");
        let before = b;
        let _ = winning_move(&b, Player::O);
        let _ = blocking_move(&b, Player::O);
        assert_eq!(b, before);
    }

    #[test]
    fn test_single_empty_cell_is_always_chosen() {
        // X O X / X O O / O X _ : cell 8 neither wins for O nor blocks X
        let b = board("XOX XOO OX_");
        assert_eq!(winning_move(&b, Player::O), None);
        assert_eq!(blocking_move(&b, Player::O), None);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            assert_eq!(random_move(&b, &mut rng), Some(8));
        }
    }

    #[test]
    fn test_heuristic_takes_single_empty_cell() {
        let b = board("XOX XOO OX_");
        for seed in 0..1000 {
            let mut ai = HeuristicAI::with_seed(seed);
            assert_eq!(
                ai.choose_move(&b, Player::O),
                Some(MoveChoice { index: 8, reason: Reason::Random })
            );
        }
    }

    #[test]
    fn test_random_move_covers_empty_cells() {
        let b = board("X__ _O_ __X");
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen = [false; 9];
        for _ in 0..500 {
            let index = random_move(&b, &mut rng).unwrap();
            assert!(b.is_empty(index).unwrap());
            seen[index] = true;
        }
        assert_eq!(seen, [false, true, true, true, false, true, true, true, false]);
    }

    #[test]
    fn test_full_board_has_no_move() {
        let b = board("XOX XOO OXX");
        let mut ai = HeuristicAI::with_seed(0);
        assert_eq!(ai.choose_move(&b, Player::O), None);
    }

    #[test]
    fn test_seeded_ai_is_reproducible() {
        let b = Board::new();
        let picks = |seed| {
            let mut ai = HeuristicAI::with_seed(seed);
            (0..10)
                .map(|_| ai.choose_move(&b, Player::O).unwrap().index)
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(11), picks(11));
    }
}

//! Session controller
//!
//! Owns one game, its scoreboard and the computer opponent. A human move that
//! leaves the game open hands back a `ComputerTurnTicket`; the caller waits as
//! long as it likes and then redeems it with `computer_move`. Tickets go stale
//! when the board changes or a new round starts, so a late callback is a no-op.

use crate::ai::HeuristicAI;
use crate::board::{BoardError, Player};
use crate::config::SessionConfig;
use crate::engine::{self, GameState, MoveOutcome, Phase, Rejection};
use crate::score::{Milestone, ScoreBoard};
use serde::{Deserialize, Serialize};

/// Claim on the computer's reply to one specific position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComputerTurnTicket {
    pub round: u64,
    pub move_number: usize,
}

/// Everything a controller needs to present one move
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    pub outcome: MoveOutcome,
    /// Result banner for a finished round
    pub message: Option<String>,
    pub milestone: Option<Milestone>,
    /// The finished round should be cleared after `reset_delay_ms`
    pub auto_reset: bool,
    /// Present when the computer should reply next
    pub computer_turn: Option<ComputerTurnTicket>,
}

/// One human against the heuristic opponent
#[derive(Clone, Debug)]
pub struct Session {
    config: SessionConfig,
    game: GameState,
    scores: ScoreBoard,
    ai: HeuristicAI,
    round: u64,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let ai = match config.seed {
            Some(seed) => HeuristicAI::with_seed(seed),
            None => HeuristicAI::new(),
        };
        Self {
            config,
            game: engine::new_game(),
            scores: ScoreBoard::new(),
            ai,
            round: 1,
        }
    }

    /// Session resuming from an existing position, scores at zero
    pub fn with_game(config: SessionConfig, game: GameState) -> Self {
        Self {
            game,
            ..Self::new(config)
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn current_score(&self) -> ScoreBoard {
        self.scores
    }

    /// Round number, starting at 1
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Ticket for the pending computer reply, if the computer is to move
    pub fn computer_ticket(&self) -> Option<ComputerTurnTicket> {
        (self.game.phase() == Phase::AwaitingComputerMove).then(|| ComputerTurnTicket {
            round: self.round,
            move_number: self.game.board().mark_count(),
        })
    }

    // ========================================================================
    // MOVES
    // ========================================================================

    /// Apply the human's (X) move
    pub fn human_move(&mut self, index: usize) -> TurnReport {
        let outcome = engine::apply_move(&mut self.game, index, Player::X);
        self.settle(outcome)
    }

    /// Human move from untrusted input; negative indices are rejected like
    /// any other cell off the board
    pub fn human_move_checked(&mut self, index: i64) -> TurnReport {
        if let Ok(index) = usize::try_from(index) {
            return self.human_move(index);
        }
        let rejection = match self.game.phase() {
            Phase::Terminal => Rejection::GameOver,
            Phase::AwaitingComputerMove => Rejection::OutOfTurn(Player::X),
            Phase::AwaitingHumanMove => BoardError::IndexOutOfRange(index).into(),
        };
        self.settle(MoveOutcome::rejected(Player::X, None, rejection))
    }

    /// Redeem a ticket for the computer's (O) reply
    pub fn computer_move(&mut self, ticket: ComputerTurnTicket) -> TurnReport {
        if self.computer_ticket() != Some(ticket) {
            tracing::debug!("dropping computer turn {:?}", ticket);
            return self.refuse_computer_turn(Rejection::Stale);
        }

        let outcome = engine::computer_turn(&mut self.game, &mut self.ai);
        self.settle(outcome)
    }

    /// Computer reply for the current position, without a ticket
    pub fn computer_move_now(&mut self) -> TurnReport {
        match self.computer_ticket() {
            Some(ticket) => self.computer_move(ticket),
            None => self.refuse_computer_turn(Rejection::OutOfTurn(Player::O)),
        }
    }

    fn refuse_computer_turn(&mut self, rejection: Rejection) -> TurnReport {
        let rejection = if self.game.is_over() {
            Rejection::GameOver
        } else {
            rejection
        };
        self.settle(MoveOutcome::rejected(Player::O, None, rejection))
    }

    /// Score the outcome and work out what the controller does next
    fn settle(&mut self, outcome: MoveOutcome) -> TurnReport {
        let milestone = if outcome.accepted {
            outcome
                .winner
                .and_then(|winner| self.scores.record_win(winner, self.config.milestone_interval))
        } else {
            None
        };

        let message = if outcome.accepted {
            self.config.names.announce(&outcome)
        } else {
            None
        };

        if let Some(text) = &message {
            tracing::info!(
                "Round {} finished: {} (score {}-{})",
                self.round,
                text,
                self.scores.player_wins,
                self.scores.computer_wins
            );
        }
        if let Some(milestone) = milestone {
            tracing::info!("Milestone reached: {:?}", milestone);
        }

        TurnReport {
            outcome,
            message,
            milestone,
            auto_reset: outcome.accepted && self.config.reset_policy.applies_to(&outcome),
            computer_turn: self.computer_ticket(),
        }
    }

    // ========================================================================
    // RESETS
    // ========================================================================

    /// Clear the board for another round; scores are kept
    pub fn new_round(&mut self) {
        self.game.reset();
        self.round += 1;
    }

    /// Clear the board and the scores
    pub fn reset(&mut self) {
        self.new_round();
        self.scores.reset();
    }

    /// Zero the scores; the board is left alone
    pub fn reset_scores(&mut self) {
        self.scores.reset();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Reason;
    use crate::config::ResetPolicy;
    use crate::engine::GameResult;

    fn seeded() -> Session {
        Session::new(SessionConfig::default().with_seed(9))
    }

    #[test]
    fn test_human_move_issues_ticket() {
        let mut session = seeded();
        let report = session.human_move(4);
        assert!(report.outcome.accepted);
        assert_eq!(
            report.computer_turn,
            Some(ComputerTurnTicket { round: 1, move_number: 1 })
        );
        assert_eq!(session.game().phase(), Phase::AwaitingComputerMove);
    }

    #[test]
    fn test_computer_move_with_ticket() {
        let mut session = seeded();
        let ticket = session.human_move(4).computer_turn.unwrap();
        let report = session.computer_move(ticket);
        assert!(report.outcome.accepted);
        assert_eq!(report.outcome.player, Player::O);
        assert_eq!(report.computer_turn, None);
        assert_eq!(session.game().phase(), Phase::AwaitingHumanMove);
    }

    #[test]
    fn test_ticket_is_single_use() {
        let mut session = seeded();
        let ticket = session.human_move(4).computer_turn.unwrap();
        session.computer_move(ticket);
        let report = session.computer_move(ticket);
        assert!(!report.outcome.accepted);
        assert_eq!(report.outcome.rejection, Some(Rejection::Stale));
        assert_eq!(session.game().board().mark_count(), 2);
    }

    #[test]
    fn test_ticket_stale_after_new_round() {
        let mut session = seeded();
        let ticket = session.human_move(0).computer_turn.unwrap();
        session.new_round();
        let report = session.computer_move(ticket);
        assert!(!report.outcome.accepted);
        assert_eq!(session.game().board().mark_count(), 0);
    }

    #[test]
    fn test_computer_move_now() {
        let mut session = seeded();
        let report = session.computer_move_now();
        assert_eq!(report.outcome.rejection, Some(Rejection::OutOfTurn(Player::O)));

        session.human_move(4);
        let report = session.computer_move_now();
        assert!(report.outcome.accepted);
        assert_eq!(session.game().board().mark_count(), 2);
    }

    #[test]
    fn test_human_cannot_move_during_computer_turn() {
        let mut session = seeded();
        session.human_move(0);
        let report = session.human_move(1);
        assert_eq!(report.outcome.rejection, Some(Rejection::OutOfTurn(Player::X)));
    }

    /// Session positioned after alternating moves from the start
    fn session_at(config: SessionConfig, moves: &[usize]) -> Session {
        let mut game = engine::new_game();
        for &index in moves {
            let player = game.current_player();
            assert!(engine::apply_move(&mut game, index, player).accepted);
        }
        Session::with_game(config, game)
    }

    fn policy(reset_policy: ResetPolicy) -> SessionConfig {
        SessionConfig::default()
            .with_seed(9)
            .with_reset_policy(reset_policy)
            .with_milestone_interval(Some(1))
    }

    #[test]
    fn test_negative_index_rejected() {
        let mut session = seeded();
        let report = session.human_move_checked(-1);
        assert!(!report.outcome.accepted);
        assert_eq!(
            report.outcome.rejection,
            Some(Rejection::Board(BoardError::IndexOutOfRange(-1)))
        );
        assert_eq!(report.computer_turn, None);
        assert_eq!(session.game().board().mark_count(), 0);

        let report = session.human_move_checked(4);
        assert!(report.outcome.accepted);
        let report = session.human_move_checked(-3);
        assert_eq!(report.outcome.rejection, Some(Rejection::OutOfTurn(Player::X)));
    }

    #[test]
    fn test_draw_leaves_scores_alone() {
        // X O X / X O O / O X X after X takes the last cell
        for (reset_policy, auto_reset) in [
            (ResetPolicy::Manual, false),
            (ResetPolicy::AfterDraw, true),
            (ResetPolicy::AfterAnyResult, true),
        ] {
            let mut session = session_at(policy(reset_policy), &[0, 1, 2, 4, 3, 5, 7, 6]);
            session.scores.record_win(Player::O, None);
            let before = session.current_score();

            let report = session.human_move(8);
            assert!(report.outcome.draw);
            assert_eq!(session.game().result(), GameResult::Draw);
            assert_eq!(report.message.as_deref(), Some("It's a draw!"));
            assert_eq!(report.milestone, None);
            assert_eq!(report.auto_reset, auto_reset, "{:?}", reset_policy);
            assert_eq!(report.computer_turn, None);
            assert_eq!(session.current_score(), before);
        }
    }

    #[test]
    fn test_human_win_is_scored() {
        // X completes the top row
        for (reset_policy, auto_reset) in [
            (ResetPolicy::Manual, false),
            (ResetPolicy::AfterDraw, false),
            (ResetPolicy::AfterAnyResult, true),
        ] {
            let mut session = session_at(policy(reset_policy), &[0, 3, 1, 4]);
            let report = session.human_move(2);
            assert_eq!(report.outcome.winner, Some(Player::X));
            assert_eq!(report.outcome.winning_line, Some([0, 1, 2]));
            assert_eq!(report.message.as_deref(), Some("Player X wins!"));
            assert_eq!(report.milestone, Some(Milestone::PlayerStreak { wins: 1 }));
            assert_eq!(report.auto_reset, auto_reset, "{:?}", reset_policy);
            assert_eq!(
                session.current_score(),
                ScoreBoard { player_wins: 1, computer_wins: 0 }
            );
        }
    }

    #[test]
    fn test_computer_win_is_scored() {
        // O O _ / X X _ / _ _ X with O to move: the win beats the block
        let mut session = session_at(policy(ResetPolicy::AfterDraw), &[3, 0, 4, 1, 8]);
        let report = session.computer_move_now();
        assert_eq!(report.outcome.index, Some(2));
        assert_eq!(report.outcome.reason, Some(Reason::Win));
        assert_eq!(report.message.as_deref(), Some("Computer wins!"));
        assert_eq!(report.milestone, Some(Milestone::ComputerStreak { wins: 1 }));
        assert!(!report.auto_reset);
        assert_eq!(
            session.current_score(),
            ScoreBoard { player_wins: 0, computer_wins: 1 }
        );
    }

    #[test]
    fn test_custom_names_in_messages() {
        let config = SessionConfig::default().with_names("Ada", "HAL");
        let mut session = session_at(config, &[3, 0, 4, 1, 8]);
        let report = session.computer_move_now();
        assert_eq!(report.message.as_deref(), Some("HAL wins!"));
    }

    #[test]
    fn test_scores_survive_new_round() {
        let mut session = seeded();
        session.scores.record_win(Player::X, None);
        session.new_round();
        assert_eq!(session.current_score().player_wins, 1);
        assert_eq!(session.round(), 2);
        session.reset();
        assert_eq!(session.current_score(), ScoreBoard::default());
        assert_eq!(session.round(), 3);
    }

    #[test]
    fn test_reset_scores_keeps_board() {
        let mut session = seeded();
        session.human_move(4);
        session.scores.record_win(Player::O, None);
        session.reset_scores();
        assert_eq!(session.current_score(), ScoreBoard::default());
        assert_eq!(session.game().board().mark_count(), 1);
    }

    #[test]
    fn test_computer_blocks_through_session() {
        let mut session = seeded();
        let ticket = session.human_move(4).computer_turn.unwrap();
        let first = session.computer_move(ticket).outcome.index.unwrap();

        // Put a second X next to the centre on a line the computer hasn't touched
        let threat = [(0, 8), (2, 6), (6, 2), (8, 0), (1, 7), (3, 5), (5, 3), (7, 1)]
            .into_iter()
            .find(|&(cell, gap)| cell != first && gap != first)
            .unwrap();
        let ticket = session.human_move(threat.0).computer_turn.unwrap();
        let report = session.computer_move(ticket);
        assert_eq!(report.outcome.index, Some(threat.1));
        assert_eq!(report.outcome.reason, Some(Reason::Block));
    }

    #[test]
    fn test_moves_after_result_are_ignored() {
        let mut session = session_at(SessionConfig::default(), &[0, 3, 1, 4, 2]);
        let report = session.human_move(8);
        assert_eq!(report.outcome.rejection, Some(Rejection::GameOver));
        assert_eq!(report.message, None);
        assert_eq!(session.current_score(), ScoreBoard::default());
        let report = session.human_move_checked(-1);
        assert_eq!(report.outcome.rejection, Some(Rejection::GameOver));
    }
}

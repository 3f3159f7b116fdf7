//! Session scoreboard

use crate::board::Player;
use serde::{Deserialize, Serialize};

/// Default number of wins between milestone announcements
pub const DEFAULT_MILESTONE_INTERVAL: u32 = 5;

/// Wins per side. Draws are not counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub player_wins: u32,
    pub computer_wins: u32,
}

/// A side reached a multiple of the milestone interval
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Milestone {
    /// The human keeps beating the computer
    PlayerStreak { wins: u32 },
    /// The computer has become the human's nemesis
    ComputerStreak { wins: u32 },
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a win for `winner` (X is the human, O the computer).
    /// Returns a milestone when the new total is a multiple of `interval`.
    pub fn record_win(&mut self, winner: Player, interval: Option<u32>) -> Option<Milestone> {
        let wins = match winner {
            Player::X => {
                self.player_wins += 1;
                self.player_wins
            }
            Player::O => {
                self.computer_wins += 1;
                self.computer_wins
            }
        };

        let interval = interval.filter(|&n| n > 0)?;
        if wins % interval != 0 {
            return None;
        }
        Some(match winner {
            Player::X => Milestone::PlayerStreak { wins },
            Player::O => Milestone::ComputerStreak { wins },
        })
    }

    pub fn wins(&self, player: Player) -> u32 {
        match player {
            Player::X => self.player_wins,
            Player::O => self.computer_wins,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

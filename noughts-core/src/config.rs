//! Session configuration

use crate::board::Player;
use crate::engine::MoveOutcome;
use crate::score::DEFAULT_MILESTONE_INTERVAL;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pause before the computer replies, in milliseconds
pub const DEFAULT_COMPUTER_DELAY_MS: u64 = 500;

/// Pause before an automatic new round, in milliseconds
pub const DEFAULT_RESET_DELAY_MS: u64 = 1000;

/// Names used in outcome messages. Presentation only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayNames {
    pub player: String,
    pub computer: String,
}

impl Default for DisplayNames {
    fn default() -> Self {
        Self {
            player: "Player".to_string(),
            computer: "Computer".to_string(),
        }
    }
}

impl DisplayNames {
    pub fn name(&self, player: Player) -> &str {
        match player {
            Player::X => &self.player,
            Player::O => &self.computer,
        }
    }

    /// Result banner text for a finished game, None while play continues
    pub fn announce(&self, outcome: &MoveOutcome) -> Option<String> {
        match outcome.winner {
            Some(Player::O) => Some(format!("{} wins!", self.computer)),
            Some(player @ Player::X) => Some(format!("Player {} wins!", player)),
            None if outcome.draw => Some("It's a draw!".to_string()),
            None => None,
        }
    }
}

/// When a finished round clears itself
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Board stays until the user starts a new round
    #[default]
    Manual,
    /// Only draws start a new round automatically
    AfterDraw,
    /// Wins and draws both start a new round automatically
    AfterAnyResult,
}

impl ResetPolicy {
    pub fn applies_to(self, outcome: &MoveOutcome) -> bool {
        match self {
            ResetPolicy::Manual => false,
            ResetPolicy::AfterDraw => outcome.draw,
            ResetPolicy::AfterAnyResult => outcome.is_terminal(),
        }
    }
}

/// Per-session settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub names: DisplayNames,
    pub reset_policy: ResetPolicy,
    /// Wins between milestone announcements (None disables them)
    pub milestone_interval: Option<u32>,
    pub computer_delay_ms: u64,
    pub reset_delay_ms: u64,
    /// Random seed for the computer opponent (None = from entropy)
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            names: DisplayNames::default(),
            reset_policy: ResetPolicy::Manual,
            milestone_interval: Some(DEFAULT_MILESTONE_INTERVAL),
            computer_delay_ms: DEFAULT_COMPUTER_DELAY_MS,
            reset_delay_ms: DEFAULT_RESET_DELAY_MS,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn with_names(mut self, player: impl Into<String>, computer: impl Into<String>) -> Self {
        self.names = DisplayNames {
            player: player.into(),
            computer: computer.into(),
        };
        self
    }

    pub fn with_reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.reset_policy = policy;
        self
    }

    pub fn with_milestone_interval(mut self, interval: Option<u32>) -> Self {
        self.milestone_interval = interval;
        self
    }

    pub fn with_computer_delay_ms(mut self, delay_ms: u64) -> Self {
        self.computer_delay_ms = delay_ms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }
}

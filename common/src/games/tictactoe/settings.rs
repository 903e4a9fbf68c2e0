use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::match_score::DEFAULT_WIN_THRESHOLD;
use super::types::{Difficulty, Mode, Player, RoundResult};

const MAX_DELAY_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicTacToeSettings {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub starting_player: Player,
    /// Off gives plain rounds with no score and no match winner.
    pub match_tracking: bool,
    pub win_threshold: u32,
    pub easy_think_delay_ms: u64,
    pub unbeatable_think_delay_ms: u64,
    pub win_pause_ms: u64,
    pub draw_pause_ms: u64,
}

impl TicTacToeSettings {
    pub fn think_delay(&self, difficulty: Difficulty) -> Duration {
        match difficulty {
            Difficulty::Easy => Duration::from_millis(self.easy_think_delay_ms),
            Difficulty::Unbeatable => Duration::from_millis(self.unbeatable_think_delay_ms),
        }
    }

    /// How long a finished round stays on screen before the board clears.
    pub fn result_pause(&self, result: &RoundResult) -> Option<Duration> {
        match result {
            RoundResult::InProgress => None,
            RoundResult::Won { .. } => Some(Duration::from_millis(self.win_pause_ms)),
            RoundResult::Draw => Some(Duration::from_millis(self.draw_pause_ms)),
        }
    }
}

impl Default for TicTacToeSettings {
    fn default() -> Self {
        Self {
            mode: Mode::HumanVsComputer,
            difficulty: Difficulty::Unbeatable,
            starting_player: Player::X,
            match_tracking: true,
            win_threshold: DEFAULT_WIN_THRESHOLD,
            easy_think_delay_ms: 520,
            unbeatable_think_delay_ms: 720,
            win_pause_ms: 1300,
            draw_pause_ms: 900,
        }
    }
}

impl Validate for TicTacToeSettings {
    fn validate(&self) -> Result<(), String> {
        if self.win_threshold == 0 {
            return Err("win_threshold must be greater than 0".to_string());
        }
        let delays = [
            ("easy_think_delay_ms", self.easy_think_delay_ms),
            ("unbeatable_think_delay_ms", self.unbeatable_think_delay_ms),
            ("win_pause_ms", self.win_pause_ms),
            ("draw_pause_ms", self.draw_pause_ms),
        ];
        for (name, value) in delays {
            if value > MAX_DELAY_MS {
                return Err(format!("{} must not exceed {} ms", name, MAX_DELAY_MS));
            }
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

use super::types::Player;

pub const DEFAULT_WIN_THRESHOLD: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub x: u32,
    pub o: u32,
    pub win_threshold: u32,
}

impl MatchScore {
    pub fn new(win_threshold: u32) -> Self {
        Self {
            x: 0,
            o: 0,
            win_threshold,
        }
    }

    pub fn get(&self, player: Player) -> u32 {
        match player {
            Player::X => self.x,
            Player::O => self.o,
        }
    }

    pub fn winner(&self) -> Option<Player> {
        if self.x >= self.win_threshold {
            Some(Player::X)
        } else if self.o >= self.win_threshold {
            Some(Player::O)
        } else {
            None
        }
    }

    /// Counts a round win. Frozen once the match has a winner.
    pub fn record_win(&mut self, player: Player) -> bool {
        if self.winner().is_some() {
            return false;
        }
        match player {
            Player::X => self.x += 1,
            Player::O => self.o += 1,
        }
        true
    }

    pub fn reset(&mut self) {
        self.x = 0;
        self.o = 0;
    }
}

impl Default for MatchScore {
    fn default() -> Self {
        Self::new(DEFAULT_WIN_THRESHOLD)
    }
}

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::match_score::MatchScore;
use super::types::{Difficulty, Mode, Player, RoundResult};

/// Everything the UI can ask of the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum GameCommand {
    SelectCell { index: usize },
    SetMode { mode: Mode },
    SetDifficulty { difficulty: Difficulty },
    SetStartingPlayer { player: Player },
    RestartRound,
    RestartMatch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    BoardReset { starting_player: Player },
    CellMarked { index: usize, player: Player },
    TurnChanged { player: Player },
    RoundResultChanged { result: RoundResult },
    ScoreChanged { score: MatchScore },
    MatchWinnerDeclared { player: Player },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub current_player: Player,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub starting_player: Player,
    pub result: RoundResult,
    pub score: Option<MatchScore>,
    pub match_winner: Option<Player>,
    pub computer_to_move: bool,
    pub round_generation: u64,
    pub status: String,
}

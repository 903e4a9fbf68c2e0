mod board;
mod bot_controller;
mod commands;
mod game_state;
mod match_score;
mod session;
mod settings;
mod types;
mod win_detector;

pub use board::{Board, CELL_COUNT};
pub use bot_controller::{MinimaxOutcome, calculate_minimax_move, compute_computer_move, minimax};
pub use commands::{GameCommand, GameEvent, GameSnapshot};
pub use game_state::{COMPUTER_PLAYER, PendingComputerMove, TicTacToeGameState};
pub use match_score::{DEFAULT_WIN_THRESHOLD, MatchScore};
pub use session::{SessionUpdate, TicTacToeSession, TicTacToeSessionHandle};
pub use settings::TicTacToeSettings;
pub use types::{Difficulty, Line, Mark, Mode, Player, RoundResult};
pub use win_detector::{LINES, check_win, check_win_with_line, evaluate_result};

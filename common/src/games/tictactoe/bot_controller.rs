use crate::games::SessionRng;
use super::board::Board;
use super::types::{Difficulty, Player};
use super::win_detector::check_win;

const WIN_SCORE: i32 = 10;

/// Picks the computer's cell. Returns `None` only when the board is full.
pub fn compute_computer_move(
    board: &Board,
    computer_player: Player,
    difficulty: Difficulty,
    rng: &mut SessionRng,
) -> Option<usize> {
    match difficulty {
        Difficulty::Easy => calculate_random_move(board, rng),
        Difficulty::Unbeatable => calculate_minimax_move(board, computer_player),
    }
}

fn calculate_random_move(board: &Board, rng: &mut SessionRng) -> Option<usize> {
    rng.choose(&board.available_moves())
}

pub fn calculate_minimax_move(board: &Board, to_move: Player) -> Option<usize> {
    minimax(board, to_move).index
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinimaxOutcome {
    pub score: i32,
    pub index: Option<usize>,
}

/// Exhaustive search. O maximises and X minimises regardless of who calls it;
/// ties keep the lowest cell index.
pub fn minimax(board: &Board, to_move: Player) -> MinimaxOutcome {
    if let Some(winner) = check_win(board) {
        let score = match winner {
            Player::O => WIN_SCORE,
            Player::X => -WIN_SCORE,
        };
        return MinimaxOutcome { score, index: None };
    }

    let mut best: Option<MinimaxOutcome> = None;

    for index in board.available_moves() {
        let Some(child) = board.with_mark(index, to_move) else {
            continue;
        };
        let score = minimax(&child, to_move.opponent()).score;

        let improves = match best {
            None => true,
            Some(current) => match to_move {
                Player::O => score > current.score,
                Player::X => score < current.score,
            },
        };
        if improves {
            best = Some(MinimaxOutcome {
                score,
                index: Some(index),
            });
        }
    }

    // No empty cell and no winner: draw.
    best.unwrap_or(MinimaxOutcome {
        score: 0,
        index: None,
    })
}

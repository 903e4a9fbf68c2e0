use super::board::Board;
use super::types::{Line, Player, RoundResult};

/// Rows, then columns, then the main and anti diagonals. The first match in
/// this order decides which line a win reports.
pub const LINES: [Line; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub fn check_win_with_line(board: &Board) -> Option<(Player, Line)> {
    let cells = board.cells();
    LINES.iter().find_map(|&line| {
        let [a, b, c] = line;
        let player = cells[a].player()?;
        (cells[a] == cells[b] && cells[a] == cells[c]).then_some((player, line))
    })
}

pub fn check_win(board: &Board) -> Option<Player> {
    check_win_with_line(board).map(|(player, _)| player)
}

pub fn evaluate_result(board: &Board) -> RoundResult {
    if let Some((player, line)) = check_win_with_line(board) {
        return RoundResult::Won { player, line };
    }
    if board.is_full() {
        return RoundResult::Draw;
    }
    RoundResult::InProgress
}

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::types::{Mark, Player};

pub const CELL_COUNT: usize = 9;

/// Row-major 3x3 grid. Cells only change through `place`, which refuses
/// occupied cells, so a mark stays until the whole board is replaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Mark; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Mark; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Mark; CELL_COUNT] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied()
    }

    pub fn is_valid_move(&self, index: usize) -> bool {
        self.get(index) == Some(Mark::Empty)
    }

    pub fn available_moves(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, mark)| mark.is_empty())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|mark| !mark.is_empty())
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|mark| !mark.is_empty()).count()
    }

    /// Returns a copy with `player`'s mark at `index`, or `None` if the move is illegal.
    pub fn with_mark(&self, index: usize, player: Player) -> Option<Board> {
        let mut next = *self;
        next.place(index, player).then_some(next)
    }

    pub(crate) fn place(&mut self, index: usize, player: Player) -> bool {
        if !self.is_valid_move(index) {
            return false;
        }
        self.cells[index] = Mark::from(player);
        true
    }
}

/// Parses nine cells written as `X`, `O` and `_`/`.`/`-` for empty.
/// Whitespace and `|` separators are ignored.
impl FromStr for Board {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [Mark::Empty; CELL_COUNT];
        let mut count = 0;

        for ch in s.chars().filter(|c| !c.is_whitespace() && *c != '|') {
            let mark = match ch {
                'X' | 'x' => Mark::X,
                'O' | 'o' => Mark::O,
                '_' | '.' | '-' => Mark::Empty,
                other => return Err(format!("Unexpected board character '{}'", other)),
            };
            if count >= CELL_COUNT {
                return Err(format!("Board must have exactly {} cells", CELL_COUNT));
            }
            cells[count] = mark;
            count += 1;
        }

        if count != CELL_COUNT {
            return Err(format!(
                "Board must have exactly {} cells, got {}",
                CELL_COUNT, count
            ));
        }

        Ok(Self { cells })
    }
}

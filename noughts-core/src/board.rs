//! 3x3 board geometry and occupancy

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Side length of the grid
pub const BOARD_SIZE: usize = 3;

/// Number of cells on the board
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Winning lines in evaluation order: rows, columns, diagonals
pub const WIN_PATTERNS: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // Rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // Columns
    [0, 4, 8], [2, 4, 6],            // Diagonals
];

// ============================================================================
// MARKS AND CELLS
// ============================================================================

/// A player's mark. X is the human and always moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Contents of a single cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// The mark held by this cell, if any
    pub fn mark(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

/// Board precondition failures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize)]
pub enum BoardError {
    /// Signed so that indices from untrusted input can be reported as given
    #[error("cell index {0} is outside the board (expected 0-8)")]
    IndexOutOfRange(i64),
    #[error("cell {0} is already occupied")]
    Occupied(usize),
    #[error("board layout must contain exactly 9 cells of X, O or _")]
    Layout,
}

// ============================================================================
// BOARD
// ============================================================================

/// Nine cells in row-major order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from explicit cell contents
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Cell at index
    pub fn get(&self, index: usize) -> Result<Cell, BoardError> {
        self.cells
            .get(index)
            .copied()
            .ok_or_else(|| BoardError::IndexOutOfRange(i64::try_from(index).unwrap_or(i64::MAX)))
    }

    pub fn is_empty(&self, index: usize) -> Result<bool, BoardError> {
        self.get(index).map(Cell::is_empty)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Write a mark. Never overwrites an occupied cell.
    pub fn set(&mut self, index: usize, player: Player) -> Result<(), BoardError> {
        if !self.is_empty(index)? {
            return Err(BoardError::Occupied(index));
        }
        self.cells[index] = player.into();
        Ok(())
    }

    /// Copy of this board with one extra mark, for look-ahead
    pub fn with_mark(&self, index: usize, player: Player) -> Result<Board, BoardError> {
        let mut next = *self;
        next.set(index, player)?;
        Ok(next)
    }

    /// Mark completing a winning line, if any
    pub fn winner(&self) -> Option<Player> {
        self.winning_line()
            .and_then(|[a, _, _]| self.cells[a].mark())
    }

    /// First completed line in pattern order
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        WIN_PATTERNS.iter().copied().find(|&[a, b, c]| {
            let first = self.cells[a];
            !first.is_empty() && first == self.cells[b] && first == self.cells[c]
        })
    }

    /// Empty cell indices in increasing order
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(index, _)| index)
    }

    /// Number of marks placed so far
    pub fn mark_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    pub fn reset(&mut self) {
        self.cells = [Cell::Empty; CELL_COUNT];
    }
}

/// (row, col) of a cell index
pub fn row_col(index: usize) -> (usize, usize) {
    (index / BOARD_SIZE, index % BOARD_SIZE)
}

/// Accepts 9 cells written as `X`, `O`, and `_`/`.`/`-` for empty.
/// Whitespace and `|` separators are ignored.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [Cell::Empty; CELL_COUNT];
        let mut count = 0;

        for ch in s.chars().filter(|c| !c.is_whitespace() && *c != '|') {
            let cell = match ch.to_ascii_uppercase() {
                'X' => Cell::X,
                'O' => Cell::O,
                '_' | '.' | '-' => Cell::Empty,
                _ => return Err(BoardError::Layout),
            };
            if count == CELL_COUNT {
                return Err(BoardError::Layout);
            }
            cells[count] = cell;
            count += 1;
        }

        if count != CELL_COUNT {
            return Err(BoardError::Layout);
        }
        Ok(Board { cells })
    }
}

/// Grid rendering; empty cells show their 1-based number
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            if row > 0 {
                writeln!(f, "---+---+---")?;
            }
            let line: Vec<String> = (0..BOARD_SIZE)
                .map(|col| {
                    let index = row * BOARD_SIZE + col;
                    match self.cells[index].mark() {
                        Some(player) => format!(" {} ", player),
                        None => format!(" {} ", index + 1),
                    }
                })
                .collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}

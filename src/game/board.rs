use std::fmt;

use super::Player;
use crate::error::{BoardError, MoveError};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Four cells forming a potential connect-four, as `(row, col)` pairs.
pub type Line = [(usize, usize); 4];

/// Number of four-cell lines on the board (69 on 6x7).
pub const LINE_COUNT: usize =
    ROWS * (COLS - 3) + (ROWS - 3) * COLS + 2 * (ROWS - 3) * (COLS - 3);

/// Every horizontal, vertical and diagonal four-cell line.
pub const LINES: [Line; LINE_COUNT] = build_lines();

/// Columns ordered from the center outwards.
pub const MOVE_ORDER: [usize; COLS] = center_out_order();

const fn build_lines() -> [Line; LINE_COUNT] {
    let mut lines = [[(0, 0); 4]; LINE_COUNT];
    let mut n = 0;
    let mut row = 0;
    while row < ROWS {
        let mut col = 0;
        while col < COLS {
            if col + 3 < COLS {
                lines[n] = [(row, col), (row, col + 1), (row, col + 2), (row, col + 3)];
                n += 1;
            }
            if row + 3 < ROWS {
                lines[n] = [(row, col), (row + 1, col), (row + 2, col), (row + 3, col)];
                n += 1;
            }
            if row + 3 < ROWS && col + 3 < COLS {
                lines[n] = [
                    (row, col),
                    (row + 1, col + 1),
                    (row + 2, col + 2),
                    (row + 3, col + 3),
                ];
                n += 1;
            }
            if row >= 3 && col + 3 < COLS {
                lines[n] = [
                    (row, col),
                    (row - 1, col + 1),
                    (row - 2, col + 2),
                    (row - 3, col + 3),
                ];
                n += 1;
            }
            col += 1;
        }
        row += 1;
    }
    lines
}

const fn center_out_order() -> [usize; COLS] {
    let mut order = [0; COLS];
    let center = COLS / 2;
    order[0] = center;
    let mut i = 1;
    let mut offset = 1;
    while i < COLS {
        if offset <= center {
            order[i] = center - offset;
            i += 1;
        }
        if i < COLS && center + offset < COLS {
            order[i] = center + offset;
            i += 1;
        }
        offset += 1;
    }
    order
}

/// Row number counted from the bottom, starting at 1. Odd rows favor the
/// first mover, even rows the second.
pub fn row_from_bottom(row: usize) -> usize {
    ROWS - row
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

impl Cell {
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Red => Some(Player::Red),
            Cell::Yellow => Some(Player::Yellow),
        }
    }
}

/// A completed four-in-a-row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinLine {
    pub player: Player,
    pub cells: Line,
}

/// The game grid. Row 0 is the top, row `ROWS - 1` the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
    heights: [usize; COLS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
            heights: [0; COLS],
        }
    }

    /// Parse a board from `ROWS` strings of `COLS` characters, top row first.
    /// `.` is empty, `R` is Red and `Y` is Yellow.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, BoardError> {
        if rows.len() != ROWS {
            return Err(BoardError::Shape {
                expected_rows: ROWS,
                expected_cols: COLS,
                rows: rows.len(),
            });
        }

        let mut board = Board::new();
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let len = line.chars().count();
            if len != COLS {
                return Err(BoardError::RowLength {
                    row,
                    len,
                    expected: COLS,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                board.cells[row][col] = match ch {
                    '.' => Cell::Empty,
                    'R' | 'r' => Cell::Red,
                    'Y' | 'y' => Cell::Yellow,
                    other => return Err(BoardError::InvalidChar(other)),
                };
            }
        }

        // Walk each column bottom-up; a piece above an empty cell is floating.
        for col in 0..COLS {
            let mut height = 0;
            for row in (0..ROWS).rev() {
                if board.cells[row][col] == Cell::Empty {
                    continue;
                }
                if row_from_bottom(row) != height + 1 {
                    return Err(BoardError::FloatingPiece { row, col });
                }
                height += 1;
            }
            board.heights[col] = height;
        }

        Ok(board)
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row 5 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Number of pieces stacked in a column.
    pub fn height(&self, col: usize) -> usize {
        self.heights[col]
    }

    /// Row a piece dropped into `col` would land on, if the column is open.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= COLS || self.heights[col] >= ROWS {
            return None;
        }
        Some(ROWS - 1 - self.heights[col])
    }

    /// True if `(row, col)` is the next cell a piece in `col` would fill.
    pub fn is_playable(&self, row: usize, col: usize) -> bool {
        self.landing_row(col) == Some(row)
    }

    /// Check if a column is full
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.heights[col] >= ROWS
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, player: Player) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn);
        }
        let row = self.landing_row(col).ok_or(MoveError::ColumnFull)?;
        self.cells[row][col] = player.to_cell();
        self.heights[col] += 1;
        Ok(row)
    }

    /// Copy-on-write drop: returns the new board and landing row, or `None`
    /// when the column cannot take a piece. `self` is never modified.
    pub fn dropped(&self, col: usize, player: Player) -> Option<(Board, usize)> {
        let mut next = *self;
        let row = next.drop_piece(col, player).ok()?;
        Some((next, row))
    }

    /// Remove the top piece of a column. Undoes `drop_piece`.
    pub fn remove_piece(&mut self, col: usize) -> Option<Cell> {
        if col >= COLS || self.heights[col] == 0 {
            return None;
        }
        let row = ROWS - self.heights[col];
        let cell = self.cells[row][col];
        self.cells[row][col] = Cell::Empty;
        self.heights[col] -= 1;
        Some(cell)
    }

    /// Total number of pieces on the board
    pub fn piece_count(&self) -> usize {
        self.heights.iter().sum()
    }

    /// Number of pieces belonging to one player
    pub fn count(&self, player: Player) -> usize {
        let cell = player.to_cell();
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&c| c == cell)
            .count()
    }

    /// The same position with Red and Yellow exchanged.
    pub fn swapped_colors(&self) -> Board {
        let mut swapped = *self;
        for cell in swapped.cells.iter_mut().flat_map(|row| row.iter_mut()) {
            *cell = match *cell {
                Cell::Empty => Cell::Empty,
                Cell::Red => Cell::Yellow,
                Cell::Yellow => Cell::Red,
            };
        }
        swapped
    }

    /// Open columns, center first.
    pub fn legal_columns(&self) -> Vec<usize> {
        MOVE_ORDER
            .iter()
            .copied()
            .filter(|&col| !self.is_column_full(col))
            .collect()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// A draw is a board whose top row has no empty cell.
    pub fn is_draw(&self) -> bool {
        self.cells[0].iter().all(|&c| c != Cell::Empty)
    }

    /// Check if the last move at (row, col) resulted in a win
    pub fn check_win(&self, row: usize, col: usize) -> bool {
        let cell = self.get(row, col);
        if cell == Cell::Empty {
            return false;
        }

        [(0, 1), (1, 0), (1, 1), (1, -1)].iter().any(|&(dr, dc)| {
            1 + self.run_length(row, col, dr, dc, cell) + self.run_length(row, col, -dr, -dc, cell)
                >= 4
        })
    }

    /// Count consecutive `cell`s from (row, col), exclusive, stepping by (dr, dc).
    fn run_length(&self, row: usize, col: usize, dr: i32, dc: i32, cell: Cell) -> usize {
        let mut count = 0;
        let mut r = row as i32 + dr;
        let mut c = col as i32 + dc;
        while r >= 0
            && r < ROWS as i32
            && c >= 0
            && c < COLS as i32
            && self.cells[r as usize][c as usize] == cell
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }

    /// Scan every line for a completed four.
    pub fn detect_win(&self) -> Option<WinLine> {
        LINES.iter().find_map(|line| {
            let (r0, c0) = line[0];
            let player = self.cells[r0][c0].player()?;
            line.iter()
                .all(|&(r, c)| self.cells[r][c] == player.to_cell())
                .then_some(WinLine {
                    player,
                    cells: *line,
                })
        })
    }

    /// Structural checks the type system cannot enforce: gravity, the
    /// alternating-turn piece balance and at most one winner.
    pub fn validate(&self) -> Result<(), BoardError> {
        for col in 0..COLS {
            for row in 0..ROWS {
                let filled = self.cells[row][col] != Cell::Empty;
                if filled != (row_from_bottom(row) <= self.heights[col]) {
                    return Err(BoardError::FloatingPiece { row, col });
                }
            }
        }

        let red = self.count(Player::Red);
        let yellow = self.count(Player::Yellow);
        if red.abs_diff(yellow) > 1 {
            return Err(BoardError::PieceImbalance { red, yellow });
        }

        let mut winners = LINES.iter().filter_map(|line| {
            let first = self.cells[line[0].0][line[0].1].player()?;
            line.iter()
                .all(|&(r, c)| self.cells[r][c] == first.to_cell())
                .then_some(first)
        });
        if let Some(winner) = winners.next() {
            if winners.any(|p| p != winner) {
                return Err(BoardError::MultipleWinners);
            }
        }
        Ok(())
    }

    fn to_rows(self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Cell::Empty => '.',
                        Cell::Red => 'R',
                        Cell::Yellow => 'Y',
                    })
                    .collect()
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<String>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Board::from_rows(rows.as_slice())
    }
}

impl From<Board> for Vec<String> {
    fn from(board: Board) -> Self {
        board.to_rows()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            let spaced: Vec<String> = row.chars().map(String::from).collect();
            writeln!(f, "{}", spaced.join(" "))?;
        }
        let labels: Vec<String> = (1..=COLS).map(|c| c.to_string()).collect();
        write!(f, "{}", labels.join(" "))
    }
}

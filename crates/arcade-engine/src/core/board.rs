use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::{Piece, PieceKind},
};

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Locked block left by a piece of the given type.
    Piece(PieceKind),
}

impl Cell {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Returns `'.'` for an empty cell, or the piece letter.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Piece(kind) => kind.as_char(),
        }
    }
}

/// A single row of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardRow {
    cells: [Cell; BOARD_WIDTH],
}

impl BoardRow {
    pub const EMPTY: Self = Self {
        cells: [Cell::Empty; BOARD_WIDTH],
    };

    #[must_use]
    pub const fn cells(&self) -> &[Cell; BOARD_WIDTH] {
        &self.cells
    }

    /// Returns `true` iff every cell in the row is occupied.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }
}

impl fmt::Display for BoardRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells
            .iter()
            .try_for_each(|cell| fmt::Write::write_char(f, cell.as_char()))
    }
}

/// Row indices removed by a single line clear, bottom-most first.
pub type ClearedRows = ArrayVec<usize, BOARD_HEIGHT>;

/// The playfield: a fixed 10×20 grid of [`Cell`]s.
///
/// Row 0 is the top of the board. Pieces may extend above row 0 while
/// spawning; those cells are never stored.
///
/// # Serialization
///
/// Serialized as one string per row, top to bottom, with `.` for empty cells
/// and the piece letter for occupied ones:
///
/// ```
/// use arcade_engine::Board;
///
/// let json = serde_json::to_string(&Board::EMPTY).unwrap();
/// assert!(json.starts_with("[\"..........\","));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.rows.iter().map(ToString::to_string))
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        if rows.len() != BOARD_HEIGHT {
            return Err(serde::de::Error::custom(format!(
                "expected {BOARD_HEIGHT} rows, got {}",
                rows.len()
            )));
        }
        Self::from_rows(rows.iter().map(String::as_str)).map_err(serde::de::Error::custom)
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [BoardRow::EMPTY; BOARD_HEIGHT],
    };

    /// Builds a board from text rows, aligned to the bottom of the board.
    ///
    /// Each row must have exactly 10 cells: `.` for empty, `#` or a piece
    /// letter for occupied (`#` is stored as an `I` block). Missing rows at
    /// the top are empty.
    pub fn from_rows<'a, I>(rows: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let rows: Vec<&str> = rows.into_iter().collect();
        if rows.len() > BOARD_HEIGHT {
            return Err(format!("expected at most {BOARD_HEIGHT} rows, got {}", rows.len()));
        }

        let mut board = Self::EMPTY;
        let top = BOARD_HEIGHT - rows.len();
        for (y, line) in rows.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != BOARD_WIDTH {
                return Err(format!(
                    "row {y} must have exactly {BOARD_WIDTH} cells, got {}",
                    chars.len()
                ));
            }
            for (x, ch) in chars.into_iter().enumerate() {
                board.rows[top + y].cells[x] = match ch {
                    '.' => Cell::Empty,
                    '#' => Cell::Piece(PieceKind::I),
                    c => Cell::Piece(
                        PieceKind::from_char(c)
                            .ok_or_else(|| format!("invalid cell '{c}' at ({x}, {y})"))?,
                    ),
                };
            }
        }
        Ok(board)
    }

    /// Creates a board from ASCII art for tests, one row per non-blank line.
    ///
    /// # Panics
    ///
    /// Panics if the art is malformed.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let rows = art.lines().map(str::trim).filter(|line| !line.is_empty());
        match Self::from_rows(rows) {
            Ok(board) => board,
            Err(e) => panic!("invalid board art: {e}"),
        }
    }

    /// Returns the cell at `(x, y)`, or `None` if it is outside the board.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.cells.get(x).copied()
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &BoardRow> {
        self.rows.iter()
    }

    /// Returns `true` if the board has no locked blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(BoardRow::is_empty)
    }

    /// Checks whether `piece` can occupy its current position.
    ///
    /// A placement is invalid when any occupied cell of the piece:
    ///
    /// - lies outside `[0, WIDTH)` horizontally,
    /// - lies at or below row `HEIGHT`,
    /// - overlaps a locked block (checked only for rows `>= 0`).
    ///
    /// Cells above the top of the board are allowed.
    #[must_use]
    pub fn is_valid_placement(&self, piece: &Piece) -> bool {
        piece.occupied_cells().all(|(x, y)| {
            let inside_walls = usize::try_from(x).is_ok_and(|x| x < Self::WIDTH);
            let above_floor = usize::try_from(y).ok().is_none_or(|y| y < Self::HEIGHT);
            inside_walls && above_floor && (y < 0 || self.cell(x, y).is_some_and(Cell::is_empty))
        })
    }

    /// Writes the piece's cells into the board.
    ///
    /// Cells above the top of the board are discarded.
    pub fn fill_piece(&mut self, piece: &Piece) {
        let block = Cell::Piece(piece.kind());
        for (x, y) in piece.occupied_cells() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.cells.get_mut(x)) {
                *cell = block;
            }
        }
    }

    /// Removes every filled row and returns their indices, bottom-most first.
    ///
    /// Rows above a cleared row move down and keep their order; empty rows are
    /// inserted at the top.
    pub fn clear_lines(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        for y in (0..BOARD_HEIGHT).rev() {
            if self.rows[y].is_filled() {
                cleared.push(y);
                continue;
            }
            if !cleared.is_empty() {
                self.rows[y + cleared.len()] = self.rows[y];
            }
        }
        self.rows[..cleared.len()].fill(BoardRow::EMPTY);
        cleared
    }
}

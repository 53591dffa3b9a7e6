use crate::engine::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Smallest board edge that still has distinct rows, columns and diagonals.
pub const MIN_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::O => "O",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected board input. Raised at the boundary so a malformed board never
/// reaches the evaluator or the search.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BoardError {
    #[error("a board of {len} cells is not a perfect square")]
    NotSquare { len: usize },
    #[error("board size {size} is below the minimum of 3")]
    TooSmall { size: usize },
    #[error("{len} cells do not fill a {size}x{size} board")]
    SizeMismatch { len: usize, size: usize },
    #[error("cell {index} holds invalid value {value:?}")]
    InvalidCell { index: usize, value: String },
    #[error("the computer and its opponent must play different marks")]
    IdenticalMarks,
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

/// Parses one cell in the browser representation: `"X"`, `"O"`, or `""` for
/// an empty cell. `"_"`, `"."` and whitespace also read as empty.
///
/// # Errors
///
/// Returns [`BoardError::InvalidCell`] for any other text.
pub fn parse_cell(index: usize, value: &str) -> Result<Option<Mark>, BoardError> {
    match value.trim() {
        "" | "_" | "." => Ok(None),
        "X" | "x" => Ok(Some(Mark::X)),
        "O" | "o" => Ok(Some(Mark::O)),
        _ => Err(BoardError::InvalidCell {
            index,
            value: value.to_string(),
        }),
    }
}

const fn side_for_len(len: usize) -> Result<usize, BoardError> {
    let mut size = 0;
    while size * size < len {
        size += 1;
    }
    if size * size != len {
        return Err(BoardError::NotSquare { len });
    }
    if size < MIN_SIZE {
        return Err(BoardError::TooSmall { size });
    }
    Ok(size)
}

/// Flattened N×N grid. Index `i` is row `i / N`, column `i % N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Board {
    size: usize,
    cells: Vec<Option<Mark>>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            size: MIN_SIZE,
            cells: vec![None; MIN_SIZE * MIN_SIZE],
        }
    }
}

impl Board {
    /// Empty board with `size` cells per edge.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TooSmall`] below a 3×3 board.
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if size < MIN_SIZE {
            return Err(BoardError::TooSmall { size });
        }
        Ok(Self {
            size,
            cells: vec![None; size * size],
        })
    }

    /// Builds a board from its cells, deriving the edge length from their count.
    ///
    /// # Errors
    ///
    /// Fails when the count is not a square or the edge is below 3.
    pub fn from_cells(cells: Vec<Option<Mark>>) -> Result<Self, BoardError> {
        let size = side_for_len(cells.len())?;
        Ok(Self { size, cells })
    }

    /// Builds a board whose edge length is stated by the caller.
    ///
    /// # Errors
    ///
    /// Fails when `size` is below 3 or the cells do not fill it.
    pub fn with_size(cells: Vec<Option<Mark>>, size: usize) -> Result<Self, BoardError> {
        if size < MIN_SIZE {
            return Err(BoardError::TooSmall { size });
        }
        if cells.len() != size * size {
            return Err(BoardError::SizeMismatch {
                len: cells.len(),
                size,
            });
        }
        Ok(Self { size, cells })
    }

    /// Parses the textual cells a UI layer holds (`"X"`, `"O"`, `""`).
    ///
    /// # Errors
    ///
    /// Fails on unreadable cell text or a count that is not a square of at
    /// least 3×3.
    pub fn parse<S: AsRef<str>>(cells: &[S]) -> Result<Self, BoardError> {
        let parsed = cells
            .iter()
            .enumerate()
            .map(|(index, value)| parse_cell(index, value.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_cells(parsed)
    }

    /// [`Board::parse`] with the edge length given up front.
    ///
    /// # Errors
    ///
    /// Fails on unreadable cell text or when the cells do not fill `size`.
    pub fn parse_with_size<S: AsRef<str>>(cells: &[S], size: usize) -> Result<Self, BoardError> {
        let parsed = cells
            .iter()
            .enumerate()
            .map(|(index, value)| parse_cell(index, value.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::with_size(parsed, size)
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.size * self.size
    }

    #[must_use]
    pub fn cells(&self) -> &[Option<Mark>] {
        &self.cells
    }

    /// Mark at `index`, `None` for an empty or out-of-range cell.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied().flatten()
    }

    #[must_use]
    pub fn is_empty_at(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(None))
    }

    /// Writes `cell` at `index`. Out-of-range writes are ignored.
    pub fn set(&mut self, index: usize, cell: Option<Mark>) {
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = cell;
        }
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.is_none().then_some(index))
    }

    #[must_use]
    pub fn has_empty(&self) -> bool {
        self.cells.iter().any(Option::is_none)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        !self.has_empty()
    }

    #[must_use]
    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|&&cell| cell == Some(mark)).count()
    }

    /// The exact centre cell. Only odd sizes have one.
    #[must_use]
    pub const fn center(&self) -> Option<usize> {
        if self.size % 2 == 1 {
            Some((self.size / 2) * self.size + self.size / 2)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn corners(&self) -> [usize; 4] {
        let n = self.size;
        [0, n - 1, n * (n - 1), n * n - 1]
    }

    #[must_use]
    pub const fn coord(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    #[must_use]
    pub const fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Compact notation: rows joined by `/`, `.` for empty cells,
    /// e.g. `XO./.X./..O`.
    #[must_use]
    pub fn to_notation(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.size);
        for (index, cell) in self.cells.iter().enumerate() {
            if index > 0 && index % self.size == 0 {
                out.push('/');
            }
            out.push(match cell {
                Some(Mark::X) => 'X',
                Some(Mark::O) => 'O',
                None => '.',
            });
        }
        out
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Reads the compact notation produced by [`Board::to_notation`].
    /// Separators (`/`) and whitespace are skipped; `.`, `_` and `-` are empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::with_capacity(s.len());
        for ch in s.chars().filter(|c| *c != '/' && !c.is_whitespace()) {
            let cell = match ch {
                'X' | 'x' => Some(Mark::X),
                'O' | 'o' => Some(Mark::O),
                '.' | '_' | '-' => None,
                other => {
                    return Err(BoardError::InvalidCell {
                        index: cells.len(),
                        value: other.to_string(),
                    })
                }
            };
            cells.push(cell);
        }
        Self::from_cells(cells)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_index, row) in self.cells.chunks(self.size).enumerate() {
            if row_index > 0 {
                writeln!(f)?;
            }
            let line: Vec<&str> = row
                .iter()
                .map(|cell| cell.map_or(".", Mark::as_str))
                .collect();
            f.write_str(&line.join(" "))?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<String>> for Board {
    type Error = BoardError;

    fn try_from(cells: Vec<String>) -> Result<Self, Self::Error> {
        Self::parse(&cells)
    }
}

impl From<Board> for Vec<String> {
    fn from(board: Board) -> Self {
        board
            .cells
            .iter()
            .map(|cell| cell.map_or_else(String::new, |mark| mark.as_str().to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_browser_cells() {
        let board = Board::parse(&["X", "", "O", "", "x", "", " ", "o", "_"]).unwrap();
        assert_eq!(board.size(), 3);
        assert_eq!(board.get(0), Some(Mark::X));
        assert_eq!(board.get(4), Some(Mark::X));
        assert_eq!(board.get(7), Some(Mark::O));
        assert!(board.is_empty_at(6));
        assert_eq!(board.empty_cells().collect::<Vec<_>>(), vec![1, 3, 5, 6, 8]);
    }

    #[test]
    fn test_rejects_non_square_length() {
        let cells = vec![""; 10];
        assert_eq!(Board::parse(&cells), Err(BoardError::NotSquare { len: 10 }));
    }

    #[test]
    fn test_rejects_small_boards() {
        assert_eq!(Board::new(2), Err(BoardError::TooSmall { size: 2 }));
        assert_eq!(
            Board::from_cells(vec![None; 4]),
            Err(BoardError::TooSmall { size: 2 })
        );
        assert_eq!(
            Board::from_cells(Vec::new()),
            Err(BoardError::TooSmall { size: 0 })
        );
    }

    #[test]
    fn test_rejects_invalid_cell_value() {
        let err = Board::parse(&["X", "O", "Z", "", "", "", "", "", ""]).unwrap_err();
        assert_eq!(
            err,
            BoardError::InvalidCell {
                index: 2,
                value: "Z".to_string()
            }
        );
    }

    #[test]
    fn test_with_size_checks_length() {
        assert_eq!(
            Board::with_size(vec![None; 9], 4),
            Err(BoardError::SizeMismatch { len: 9, size: 4 })
        );
        assert!(Board::parse_with_size(&vec![""; 16], 4).is_ok());
    }

    #[test]
    fn test_notation() {
        let board: Board = "XO./.X./..O".parse().unwrap();
        assert_eq!(board.to_notation(), "XO./.X./..O");
        assert_eq!(board.count(Mark::X), 2);
        assert_eq!(board.count(Mark::O), 2);

        let err = "XO?/.../...".parse::<Board>().unwrap_err();
        assert!(matches!(err, BoardError::InvalidCell { index: 2, .. }));
    }

    #[test]
    fn test_geometry() {
        let three = Board::new(3).unwrap();
        assert_eq!(three.center(), Some(4));
        assert_eq!(three.corners(), [0, 2, 6, 8]);
        assert_eq!(three.coord(5), (1, 2));
        assert_eq!(three.index_of(2, 1), 7);

        let four = Board::new(4).unwrap();
        assert_eq!(four.center(), None);
        assert_eq!(four.corners(), [0, 3, 12, 15]);

        let five = Board::new(5).unwrap();
        assert_eq!(five.center(), Some(12));
    }

    #[test]
    fn test_serde_uses_browser_strings() {
        let board: Board = "X../.O./...".parse().unwrap();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#"["X","","","","O","","","",""]"#);

        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);

        assert!(serde_json::from_str::<Board>(r#"["X","",""]"#).is_err());
    }

    #[test]
    fn test_display_grid() {
        let board: Board = "XO./.X./..O".parse().unwrap();
        assert_eq!(board.to_string(), "X O .\n. X .\n. . O");
    }
}

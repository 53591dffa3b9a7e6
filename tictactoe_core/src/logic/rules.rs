use crate::logic::board::{Board, BoardError, Mark};
use serde::{Deserialize, Serialize};

/// N cell indices forming a row, a column or a main diagonal.
pub type Line = Vec<usize>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Active,
    Draw,
    Win { mark: Mark, line: Line },
}

impl GameStatus {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }

    #[must_use]
    pub const fn winner(&self) -> Option<Mark> {
        match self {
            Self::Win { mark, .. } => Some(*mark),
            _ => None,
        }
    }
}

/// Every line that can decide a game on a `size`×`size` board: rows, then
/// columns, then the main diagonal, then the anti-diagonal. Always `2N + 2`
/// lines, each in increasing index order.
#[must_use]
pub fn winning_lines(size: usize) -> Vec<Line> {
    let mut lines = Vec::with_capacity(2 * size + 2);

    for row in 0..size {
        lines.push((0..size).map(|col| row * size + col).collect());
    }
    for col in 0..size {
        lines.push((0..size).map(|row| row * size + col).collect());
    }
    lines.push((0..size).map(|i| i * size + i).collect());
    lines.push((0..size).map(|i| i * size + (size - 1 - i)).collect());

    lines
}

/// First line, in enumeration order, fully owned by one mark.
#[must_use]
pub fn find_winning_line<'a>(board: &Board, lines: &'a [Line]) -> Option<(Mark, &'a Line)> {
    lines.iter().find_map(|line| {
        let (&first, rest) = line.split_first()?;
        let mark = board.get(first)?;
        rest.iter()
            .all(|&index| board.get(index) == Some(mark))
            .then_some((mark, line))
    })
}

/// Status of `board` against a precomputed line set for its size.
#[must_use]
pub fn evaluate_with_lines(board: &Board, lines: &[Line]) -> GameStatus {
    if let Some((mark, line)) = find_winning_line(board, lines) {
        return GameStatus::Win {
            mark,
            line: line.clone(),
        };
    }
    if board.is_full() {
        GameStatus::Draw
    } else {
        GameStatus::Active
    }
}

#[must_use]
pub fn evaluate_status(board: &Board) -> GameStatus {
    evaluate_with_lines(board, &winning_lines(board.size()))
}

/// Validates raw UI cells against `size` and evaluates them.
///
/// # Errors
///
/// Returns the [`BoardError`] raised while parsing the cells.
pub fn evaluate_cells<S: AsRef<str>>(cells: &[S], size: usize) -> Result<GameStatus, BoardError> {
    let board = Board::parse_with_size(cells, size)?;
    Ok(evaluate_status(&board))
}

/// Whether placing `mark` on the empty cell `index` wins the game for `mark`.
#[must_use]
pub fn completes_line(board: &Board, lines: &[Line], index: usize, mark: Mark) -> bool {
    if !board.is_empty_at(index) {
        return false;
    }
    lines.iter().filter(|line| line.contains(&index)).any(|line| {
        line.iter()
            .all(|&cell| cell == index || board.get(cell) == Some(mark))
    })
}

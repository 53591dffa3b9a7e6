use crate::logic::board::{Board, BoardError, Mark};
use crate::logic::rules::{evaluate_with_lines, winning_lines, GameStatus, Line};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MoveError {
    #[error("cell {index} is outside a board of {cells} cells")]
    OutOfBounds { index: usize, cells: usize },
    #[error("cell {index} is already occupied")]
    Occupied { index: usize },
    #[error("the game is already over")]
    GameOver,
    #[error("there is no move to undo")]
    NothingToUndo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub index: usize,
    pub mark: Mark,
    pub note: Option<String>, // For AI stats or other info
}

/// One game in progress. The caller owns this value and hands the board to
/// the engine each turn; nothing in the crate keeps it between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub turn: Mark,
    pub status: GameStatus,
    pub last_move: Option<usize>,
    pub history: Vec<MoveRecord>,
    #[serde(skip)]
    lines: Vec<Line>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::from_board(Board::default(), Mark::X)
    }
}

impl GameState {
    /// Fresh game on an empty `size`×`size` board with `first` to move.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TooSmall`] below a 3×3 board.
    pub fn new(size: usize, first: Mark) -> Result<Self, BoardError> {
        Ok(Self::from_board(Board::new(size)?, first))
    }

    /// Resumes from an arbitrary position with `turn` to move.
    #[must_use]
    pub fn from_board(board: Board, turn: Mark) -> Self {
        let lines = winning_lines(board.size());
        let status = evaluate_with_lines(&board, &lines);
        Self {
            board,
            turn,
            status,
            last_move: None,
            history: Vec::new(),
            lines,
        }
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    #[must_use]
    pub fn empty_cells(&self) -> Vec<usize> {
        self.board.empty_cells().collect()
    }

    /// Places the mark of the side to move on `index` and returns the new status.
    ///
    /// # Errors
    ///
    /// Rejects moves after the game ended, outside the board, or onto an
    /// occupied cell.
    pub fn make_move(&mut self, index: usize) -> Result<GameStatus, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        if index >= self.board.cell_count() {
            return Err(MoveError::OutOfBounds {
                index,
                cells: self.board.cell_count(),
            });
        }
        if !self.board.is_empty_at(index) {
            return Err(MoveError::Occupied { index });
        }

        self.board.set(index, Some(self.turn));
        self.history.push(MoveRecord {
            index,
            mark: self.turn,
            note: None,
        });
        self.last_move = Some(index);
        self.turn = self.turn.opposite();
        self.update_status();

        Ok(self.status.clone())
    }

    /// Attaches a note (e.g. search statistics) to the most recent move.
    pub fn annotate_last(&mut self, note: impl Into<String>) {
        if let Some(record) = self.history.last_mut() {
            record.note = Some(note.into());
        }
    }

    /// Takes back the last move and hands the turn back to its player.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::NothingToUndo`] on an empty history.
    pub fn undo(&mut self) -> Result<MoveRecord, MoveError> {
        let record = self.history.pop().ok_or(MoveError::NothingToUndo)?;
        self.board.set(record.index, None);
        self.turn = record.mark;
        self.last_move = self.history.last().map(|prev| prev.index);
        self.update_status();
        Ok(record)
    }

    fn update_status(&mut self) {
        // Deserialized states arrive without their line cache.
        if self.lines.is_empty() {
            self.lines = winning_lines(self.board.size());
        }
        self.status = evaluate_with_lines(&self.board, &self.lines);
    }
}

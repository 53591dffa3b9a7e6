//! Game-outcome evaluation and computer-opponent move search for N×N
//! tic-tac-toe.
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)
)]

pub mod engine;
pub mod logic;
pub mod worker;

pub use engine::config::{ConfigError, EngineConfig};
pub use engine::policy::RandomSource;
pub use engine::search::MinimaxEngine;
pub use engine::{choose_move, choose_move_with, Difficulty, SearchOutcome, SearchStats};
pub use logic::board::{Board, BoardError, Mark};
pub use logic::game::{GameState, MoveError};
pub use logic::rules::{evaluate_cells, evaluate_status, winning_lines, GameStatus, Line};

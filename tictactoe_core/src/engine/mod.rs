use crate::engine::config::EngineConfig;
use crate::engine::policy::RandomSource;
use crate::engine::search::MinimaxEngine;
use crate::logic::board::{Board, BoardError, Mark};
use crate::logic::rules::{evaluate_status, Line};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod config;
pub mod eval;
pub mod policy;
pub mod search;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random cell.
    #[default]
    Easy,
    /// Win, block, centre, corner, with occasional random slips.
    Medium,
    /// Full-depth alpha-beta on 3×3.
    Hard,
    /// Deeper capped alpha-beta with the line heuristic at the cutoff.
    Impossible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchStats {
    pub max_depth: Option<u8>,
    pub deepest_ply: u32,
    pub nodes: u32,
    pub time_ms: u64,
    pub timed_out: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// `None` when no cell is free or the game is already decided.
    pub best_move: Option<usize>,
    /// From the AI's point of view.
    pub score: i32,
    pub stats: SearchStats,
}

pub trait Evaluator {
    fn evaluate(&self, board: &Board, lines: &[Line], perspective: Mark) -> i32;
}

/// Picks the computer's next cell.
///
/// Returns `Ok(None)` when there is nothing to play: the board is full or
/// already won.
///
/// # Errors
///
/// Fails when both sides were given the same mark, or when `config` cannot
/// rank positions on a board of this size (see [`EngineConfig::validate`]).
pub fn choose_move<R: RandomSource + ?Sized>(
    board: &Board,
    ai: Mark,
    human: Mark,
    difficulty: Difficulty,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<Option<usize>, BoardError> {
    let mut engine = MinimaxEngine::new(Arc::new(config.clone()));
    choose_move_with(&mut engine, board, ai, human, difficulty, rng)
}

/// [`choose_move`] on a long-lived engine, using the engine's configuration.
///
/// # Errors
///
/// Same as [`choose_move`].
pub fn choose_move_with<R: RandomSource + ?Sized>(
    engine: &mut MinimaxEngine,
    board: &Board,
    ai: Mark,
    human: Mark,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<Option<usize>, BoardError> {
    if ai == human {
        return Err(BoardError::IdenticalMarks);
    }
    let config = Arc::clone(engine.config());
    config.validate(board.size())?;
    if evaluate_status(board).is_terminal() {
        return Ok(None);
    }

    let index = match difficulty {
        Difficulty::Easy => policy::random_move(board, rng),
        Difficulty::Medium => {
            policy::heuristic_move(board, ai, human, config.optimal_play_chance, rng)
        }
        Difficulty::Hard | Difficulty::Impossible => {
            let max_depth = config.depth_cap(difficulty, board.size());
            engine.search(board, ai, human, max_depth).best_move
        }
    };
    Ok(index)
}

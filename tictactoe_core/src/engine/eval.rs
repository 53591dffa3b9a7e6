use crate::engine::config::EngineConfig;
use crate::engine::Evaluator;
use crate::logic::board::{Board, Mark};
use crate::logic::rules::Line;
use std::sync::Arc;

/// Line-counting heuristic used where a capped search stops short of the end
/// of the game.
pub struct LineEvaluator {
    config: Arc<EngineConfig>,
}

impl LineEvaluator {
    #[must_use]
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    /// Contribution of one line, positive when it favours `perspective`.
    #[must_use]
    pub fn score_line(&self, board: &Board, line: &[usize], perspective: Mark) -> i32 {
        let mut own = 0;
        let mut other = 0;
        let mut empty = 0;
        for &index in line {
            match board.get(index) {
                Some(mark) if mark == perspective => own += 1,
                Some(_) => other += 1,
                None => empty += 1,
            }
        }

        let n = line.len();
        if own == n {
            return self.config.weight_full_line;
        }
        if other == n {
            return self.config.weight_full_line.saturating_neg();
        }
        if own + 1 == n && empty == 1 {
            return self.config.weight_one_away;
        }
        if other + 1 == n && empty == 1 {
            return self.config.weight_one_away.saturating_neg();
        }
        if own + 2 == n && empty == 2 {
            return self.config.weight_two_away;
        }
        if other + 2 == n && empty == 2 {
            return self.config.weight_two_away.saturating_neg();
        }
        0
    }
}

impl Evaluator for LineEvaluator {
    fn evaluate(&self, board: &Board, lines: &[Line], perspective: Mark) -> i32 {
        lines
            .iter()
            .map(|line| self.score_line(board, line, perspective))
            .fold(0, i32::saturating_add)
    }
}

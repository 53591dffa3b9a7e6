use crate::logic::board::{Board, Mark};
use crate::logic::rules::{completes_line, winning_lines, Line};
use rand::Rng;

/// Randomness the lighter difficulty tiers draw on. Every `rand::Rng`
/// qualifies; tests substitute a scripted source to force a branch.
pub trait RandomSource {
    /// `true` with the given probability.
    fn chance(&mut self, probability: f64) -> bool;

    /// Uniform index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() || probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.gen_bool(probability)
    }

    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.gen_range(0..len)
    }
}

fn pick_from<R: RandomSource + ?Sized>(cells: &[usize], rng: &mut R) -> Option<usize> {
    if cells.is_empty() {
        return None;
    }
    let choice = rng.pick(cells.len());
    cells.get(choice).copied()
}

/// Uniformly random empty cell.
pub fn random_move<R: RandomSource + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    let empty: Vec<usize> = board.empty_cells().collect();
    pick_from(&empty, rng)
}

/// Lowest empty index that completes a line for `mark`.
#[must_use]
pub fn winning_move(board: &Board, lines: &[Line], mark: Mark) -> Option<usize> {
    board
        .empty_cells()
        .find(|&index| completes_line(board, lines, index, mark))
}

/// Rule-based play that sometimes slips: with `optimal_play_chance` it wins,
/// blocks, takes the centre, then a corner, then anything; otherwise it plays
/// a random cell.
pub fn heuristic_move<R: RandomSource + ?Sized>(
    board: &Board,
    ai: Mark,
    human: Mark,
    optimal_play_chance: f64,
    rng: &mut R,
) -> Option<usize> {
    let empty: Vec<usize> = board.empty_cells().collect();
    if empty.is_empty() {
        return None;
    }

    if !rng.chance(optimal_play_chance) {
        log::trace!("medium tier: slipping to a random cell");
        return pick_from(&empty, rng);
    }

    let lines = winning_lines(board.size());
    if let Some(index) = winning_move(board, &lines, ai) {
        log::trace!("medium tier: completing line at {index}");
        return Some(index);
    }
    if let Some(index) = winning_move(board, &lines, human) {
        log::trace!("medium tier: blocking at {index}");
        return Some(index);
    }
    if let Some(center) = board.center().filter(|&c| board.is_empty_at(c)) {
        return Some(center);
    }

    let corners: Vec<usize> = board
        .corners()
        .into_iter()
        .filter(|&c| board.is_empty_at(c))
        .collect();
    if !corners.is_empty() {
        return pick_from(&corners, rng);
    }

    pick_from(&empty, rng)
}

use crate::engine::config::EngineConfig;
use crate::engine::eval::LineEvaluator;
use crate::engine::{Evaluator, SearchOutcome, SearchStats};
use crate::logic::board::{Board, Mark};
use crate::logic::rules::{find_winning_line, winning_lines, Line};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
struct Sides {
    ai: Mark,
    human: Mark,
}

/// Minimax with alpha-beta pruning. Searches to the end of the game unless a
/// depth cap is given, in which case nodes at the cap are scored by the
/// line heuristic.
pub struct MinimaxEngine {
    config: Arc<EngineConfig>,
    evaluator: LineEvaluator,
    lines: Vec<Line>,
    nodes_searched: u32,
    deepest_ply: u32,
    start_time: f64,
    time_limit: Option<f64>,
    timed_out: bool,
}

impl MinimaxEngine {
    #[must_use]
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            evaluator: LineEvaluator::new(config.clone()),
            config,
            lines: Vec::new(),
            nodes_searched: 0,
            deepest_ply: 0,
            start_time: 0.0,
            time_limit: None,
            timed_out: false,
        }
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        self.evaluator = LineEvaluator::new(config.clone());
        self.config = config;
    }

    #[must_use]
    pub const fn config(&self) -> &Arc<EngineConfig> {
        &self.config
    }

    fn now() -> f64 {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            if let Some(window) = web_sys::window() {
                return window.performance().map(|p| p.now()).unwrap_or(0.0);
            }
            let global = js_sys::global();
            if let Ok(worker) = global.dyn_into::<web_sys::WorkerGlobalScope>() {
                return worker.performance().map(|p| p.now()).unwrap_or(0.0);
            }
            0.0
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::time::{SystemTime, UNIX_EPOCH};
            let since_the_epoch = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default();
            #[allow(clippy::cast_precision_loss)]
            let time_ms = (since_the_epoch.as_secs() as f64).mul_add(
                1000.0,
                f64::from(since_the_epoch.subsec_nanos()) / 1_000_000.0,
            );
            time_ms
        }
    }

    #[allow(clippy::manual_is_multiple_of)]
    fn check_time(&mut self) -> bool {
        if self.timed_out {
            return true;
        }
        if let Some(limit) = self.time_limit {
            if self.nodes_searched % 1024 == 0 {
                let elapsed = Self::now() - self.start_time;
                if elapsed > limit {
                    self.timed_out = true;
                }
            }
        }
        self.timed_out
    }

    fn terminal_score(&self, winner: Mark, depth: u32, sides: Sides) -> i32 {
        let depth = i32::try_from(depth).unwrap_or(i32::MAX);
        if winner == sides.ai {
            self.config.win_score.saturating_sub(depth)
        } else {
            depth.saturating_sub(self.config.win_score)
        }
    }

    /// Scores `board` with `maximizing` telling whether the AI is to move.
    /// Returns `None` once the time budget runs out.
    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &mut self,
        board: &mut Board,
        depth: u32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
        max_depth: Option<u8>,
        sides: Sides,
    ) -> Option<i32> {
        self.nodes_searched += 1;
        self.deepest_ply = self.deepest_ply.max(depth);

        if self.check_time() {
            return None;
        }

        if let Some((winner, _)) = find_winning_line(board, &self.lines) {
            return Some(self.terminal_score(winner, depth, sides));
        }
        if board.is_full() {
            return Some(0);
        }
        if max_depth.is_some_and(|cap| depth >= u32::from(cap)) {
            return Some(self.evaluator.evaluate(board, &self.lines, sides.ai));
        }

        let to_play = if maximizing { sides.ai } else { sides.human };
        let moves: Vec<usize> = board.empty_cells().collect();
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for index in moves {
            board.set(index, Some(to_play));
            let score = self.alpha_beta(
                board,
                depth + 1,
                !maximizing,
                alpha,
                beta,
                max_depth,
                sides,
            );
            board.set(index, None);
            let score = score?;

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }

        Some(best)
    }

    /// Best move for `ai` on `board`, searching at most `max_depth` plies
    /// (`None` for no cap). The caller's board is never touched.
    pub fn search(
        &mut self,
        board: &Board,
        ai: Mark,
        human: Mark,
        max_depth: Option<u8>,
    ) -> SearchOutcome {
        self.nodes_searched = 0;
        self.deepest_ply = 0;
        self.timed_out = false;
        self.start_time = Self::now();
        #[allow(clippy::cast_precision_loss)]
        let time_limit = self.config.time_limit_ms.map(|t| t as f64);
        self.time_limit = time_limit;
        self.lines = winning_lines(board.size());

        // A zero cap would stop at the root without choosing anything.
        let max_depth = max_depth.map(|d| d.max(1));
        let sides = Sides { ai, human };
        let mut scratch = board.clone();
        let (best_move, score) = self.search_root(&mut scratch, max_depth, sides);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let time_ms = (Self::now() - self.start_time).max(0.0) as u64;
        let stats = SearchStats {
            max_depth,
            deepest_ply: self.deepest_ply,
            nodes: self.nodes_searched,
            time_ms,
            timed_out: self.timed_out,
        };

        if self.timed_out {
            log::warn!(
                "search hit its {:?} ms budget after {} nodes",
                self.config.time_limit_ms,
                stats.nodes
            );
        }
        log::debug!(
            "search {}x{} cap={:?}: move={:?} score={} nodes={} ply={} time={}ms",
            board.size(),
            board.size(),
            max_depth,
            best_move,
            score,
            stats.nodes,
            stats.deepest_ply,
            stats.time_ms
        );

        SearchOutcome {
            best_move,
            score,
            stats,
        }
    }

    fn search_root(
        &mut self,
        board: &mut Board,
        max_depth: Option<u8>,
        sides: Sides,
    ) -> (Option<usize>, i32) {
        self.nodes_searched += 1;

        if let Some((winner, _)) = find_winning_line(board, &self.lines) {
            return (None, self.terminal_score(winner, 0, sides));
        }
        let moves: Vec<usize> = board.empty_cells().collect();
        let Some(&fallback) = moves.first() else {
            return (None, 0);
        };

        let mut alpha = i32::MIN;
        let beta = i32::MAX;
        let mut best_score = i32::MIN;
        let mut best_move = None;

        for index in moves {
            board.set(index, Some(sides.ai));
            let score = self.alpha_beta(board, 1, false, alpha, beta, max_depth, sides);
            board.set(index, None);

            let Some(score) = score else {
                break;
            };
            if score > best_score {
                best_score = score;
                best_move = Some(index);
            }
            alpha = alpha.max(score);
        }

        // Out of time before the first reply was scored.
        best_move.map_or((Some(fallback), 0), |index| (Some(index), best_score))
    }
}

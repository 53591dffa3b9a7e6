use crate::engine::config::EngineConfig;
use crate::engine::policy::RandomSource;
use crate::engine::search::MinimaxEngine;
use crate::engine::{choose_move_with, Difficulty};
use crate::logic::board::{Board, BoardError, Mark};
use crate::logic::rules::{evaluate_status, GameStatus};
use gloo_worker::{HandlerId, Worker, WorkerScope};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Input {
    ComputeMove {
        board: Board,
        ai: Mark,
        human: Mark,
        difficulty: Difficulty,
        config: EngineConfig,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Output {
    MoveFound { index: usize, status_after: GameStatus },
    NoMove { status: GameStatus },
    Rejected(BoardError),
}

/// Answers one request on `engine`, switching it to the request's config
/// first. Kept apart from the worker so it runs off-browser too.
pub fn handle_input<R: RandomSource + ?Sized>(
    input: Input,
    engine: &mut MinimaxEngine,
    rng: &mut R,
) -> Output {
    match input {
        Input::ComputeMove {
            board,
            ai,
            human,
            difficulty,
            config,
        } => {
            engine.update_config(Arc::new(config));
            match choose_move_with(engine, &board, ai, human, difficulty, rng) {
                Ok(Some(index)) => {
                    let mut next = board;
                    next.set(index, Some(ai));
                    Output::MoveFound {
                        index,
                        status_after: evaluate_status(&next),
                    }
                }
                Ok(None) => Output::NoMove {
                    status: evaluate_status(&board),
                },
                Err(err) => {
                    log::warn!("rejected move request: {err}");
                    Output::Rejected(err)
                }
            }
        }
    }
}

pub struct GameWorker {
    engine: MinimaxEngine,
    rng: StdRng,
}

impl Worker for GameWorker {
    type Input = Input;
    type Message = ();
    type Output = Output;

    fn create(_scope: &WorkerScope<Self>) -> Self {
        Self {
            engine: MinimaxEngine::new(Arc::new(EngineConfig::default())),
            rng: StdRng::from_entropy(),
        }
    }

    fn update(&mut self, _scope: &WorkerScope<Self>, _msg: Self::Message) {}

    fn received(&mut self, scope: &WorkerScope<Self>, msg: Self::Input, id: HandlerId) {
        let output = handle_input(msg, &mut self.engine, &mut self.rng);
        scope.respond(id, output);
    }
}

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tictactoe_core::{
    choose_move, evaluate_cells, evaluate_status, winning_lines, Board, BoardError, Difficulty,
    EngineConfig, GameState, GameStatus, Mark, MinimaxEngine, RandomSource,
};

const ALL: [Difficulty; 4] = [
    Difficulty::Easy,
    Difficulty::Medium,
    Difficulty::Hard,
    Difficulty::Impossible,
];

/// Always takes the optimal branch of the medium tier.
struct AlwaysOptimal;

impl RandomSource for AlwaysOptimal {
    fn chance(&mut self, _probability: f64) -> bool {
        true
    }

    fn pick(&mut self, _len: usize) -> usize {
        0
    }
}

fn board(notation: &str) -> Board {
    notation.parse().unwrap()
}

#[test]
fn empty_board_medium_opens_in_centre() {
    let b = Board::new(3).unwrap();
    let index = choose_move(
        &b,
        Mark::O,
        Mark::X,
        Difficulty::Medium,
        &EngineConfig::default(),
        &mut AlwaysOptimal,
    );
    assert_eq!(index, Ok(Some(4)));
}

#[test]
fn hard_completes_diagonal() {
    let cells = ["X", "O", "X", "O", "X", "O", "", "", ""];
    let b = Board::parse(&cells).unwrap();
    let mut rng = StdRng::seed_from_u64(9);
    let index = choose_move(
        &b,
        Mark::X,
        Mark::O,
        Difficulty::Hard,
        &EngineConfig::default(),
        &mut rng,
    )
    .unwrap()
    .unwrap();

    // Both 6 and 8 finish a diagonal; the lowest index is taken.
    assert!(index == 6 || index == 8);
    assert_eq!(index, 6);

    let mut next = b.clone();
    next.set(index, Some(Mark::X));
    assert_eq!(evaluate_status(&next).winner(), Some(Mark::X));
}

#[test]
fn capped_search_on_empty_four_by_four() {
    let mut engine = MinimaxEngine::new(Arc::new(EngineConfig::default()));
    let b = Board::new(4).unwrap();
    let outcome = engine.search(&b, Mark::O, Mark::X, Some(4));

    let index = outcome.best_move.unwrap();
    assert!(index < 16);
    assert!(outcome.stats.deepest_ply <= 4);
    assert!(outcome.stats.nodes > 0);
    assert!(!outcome.stats.timed_out);
}

#[test]
fn drawn_board_has_no_move() {
    let b = board("XOX/XOO/OXX");
    assert_eq!(evaluate_status(&b), GameStatus::Draw);

    let mut rng = StdRng::seed_from_u64(10);
    for difficulty in ALL {
        assert_eq!(
            choose_move(&b, Mark::X, Mark::O, difficulty, &EngineConfig::default(), &mut rng),
            Ok(None)
        );
    }
}

#[test]
fn hard_is_deterministic() {
    let b = board("X../.O./..X");
    let config = EngineConfig::default();
    let first = choose_move(&b, Mark::O, Mark::X, Difficulty::Hard, &config, &mut StdRng::seed_from_u64(1));
    let second = choose_move(&b, Mark::O, Mark::X, Difficulty::Hard, &config, &mut StdRng::seed_from_u64(2));
    assert_eq!(first, second);
    assert!(first.unwrap().is_some());
}

#[test]
fn hard_blocks_on_larger_boards() {
    let config = EngineConfig::default();
    let mut rng = StdRng::seed_from_u64(12);

    let b = board("XXX./OO../..../....");
    assert_eq!(
        choose_move(&b, Mark::O, Mark::X, Difficulty::Hard, &config, &mut rng),
        Ok(Some(3))
    );

    let b = board("O..../.O.../...../...../XXXX.");
    assert_eq!(
        choose_move(&b, Mark::O, Mark::X, Difficulty::Hard, &config, &mut rng),
        Ok(Some(24))
    );
}

#[test]
fn boundary_rejects_bad_input() {
    assert_eq!(
        Board::parse(&["X", "O", "", ""]),
        Err(BoardError::TooSmall { size: 2 })
    );
    assert_eq!(
        Board::parse(&vec![""; 8]),
        Err(BoardError::NotSquare { len: 8 })
    );
    assert!(matches!(
        evaluate_cells(&["X", "", "", "", "Y", "", "", "", ""], 3),
        Err(BoardError::InvalidCell { index: 4, .. })
    ));
    assert_eq!(
        choose_move(
            &Board::new(3).unwrap(),
            Mark::X,
            Mark::X,
            Difficulty::Easy,
            &EngineConfig::default(),
            &mut AlwaysOptimal
        ),
        Err(BoardError::IdenticalMarks)
    );
}

/// Reference check: scans lines the slow way.
fn naive_status(b: &Board) -> GameStatus {
    for line in winning_lines(b.size()) {
        let marks: Vec<Option<Mark>> = line.iter().map(|&i| b.get(i)).collect();
        if let Some(Some(first)) = marks.first() {
            if marks.iter().all(|m| *m == Some(*first)) {
                return GameStatus::Win {
                    mark: *first,
                    line,
                };
            }
        }
    }
    if b.empty_cells().next().is_none() {
        GameStatus::Draw
    } else {
        GameStatus::Active
    }
}

#[test]
fn random_playouts_agree_with_naive_status() {
    let mut rng = StdRng::seed_from_u64(2024);
    for round in 0..300 {
        let size = 3 + round % 3;
        let mut game = GameState::new(size, Mark::X).unwrap();
        loop {
            let status = evaluate_status(&game.board);
            assert_eq!(status, naive_status(&game.board), "{}", game.board.to_notation());
            assert_eq!(status, game.status);
            if status.is_terminal() {
                if let GameStatus::Win { mark, line } = &status {
                    assert_eq!(line.len(), size);
                    assert!(line.iter().all(|&i| game.board.get(i) == Some(*mark)));
                }
                break;
            }
            let empty = game.empty_cells();
            let index = empty[rng.gen_range(0..empty.len())];
            game.make_move(index).unwrap();
        }
    }
}

#[test]
fn session_plays_a_full_game_against_the_engine() {
    let config = EngineConfig::default();
    let mut rng = StdRng::seed_from_u64(77);
    let mut game = GameState::new(3, Mark::X).unwrap();

    while !game.is_over() {
        let index = if game.turn == Mark::X {
            choose_move(&game.board, Mark::X, Mark::O, Difficulty::Easy, &config, &mut rng)
        } else {
            choose_move(&game.board, Mark::O, Mark::X, Difficulty::Hard, &config, &mut rng)
        }
        .unwrap()
        .unwrap();
        game.make_move(index).unwrap();
    }

    assert_ne!(game.status.winner(), Some(Mark::X));
}

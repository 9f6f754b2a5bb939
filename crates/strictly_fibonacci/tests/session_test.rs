//! Tests for the session lifecycle: clearing, winning and game over.

use rand::SeedableRng;
use rand::rngs::StdRng;
use strictly_fibonacci::{
    Direction, EventLog, GameConfig, GameEvent, GameManager, GameType, Grid, SessionPhase,
};

fn game(game_type: GameType, rows: &[&[u32]]) -> GameManager<EventLog> {
    let grid = Grid::from_levels(rows).unwrap();
    let config = GameConfig::new(grid.dimension(), game_type).unwrap();
    GameManager::from_grid(config, grid, EventLog::new(), StdRng::seed_from_u64(11)).unwrap()
}

fn count(game: &GameManager<EventLog>, wanted: GameEvent) -> usize {
    game.presenter().count(|event| *event == wanted)
}

// ─────────────────────────────────────────────────────────────
//  Starting sessions
// ─────────────────────────────────────────────────────────────

#[test]
fn test_new_session_waits_for_clear() {
    let config = GameConfig::new(4, GameType::Fibonacci).unwrap();
    let mut game = GameManager::with_rng(config, EventLog::new(), StdRng::seed_from_u64(5));

    game.start_new_session(config);

    assert_eq!(game.phase(), SessionPhase::Clearing);
    assert_eq!(game.live_tiles(), 0);
    assert_eq!(game.grid().occupied_count(), 0);
    assert_eq!(count(&game, GameEvent::ClearBegun), 1);
    assert_eq!(game.presenter().last_score(), Some(0));

    // Moves wait until the board is ready.
    game.move_to(Direction::Left);
    assert_eq!(game.grid().occupied_count(), 0);

    game.on_cleared();
    assert_eq!(game.phase(), SessionPhase::Idle);
    assert_eq!(game.live_tiles(), 2);
    assert_eq!(game.grid().occupied_count(), 2);
    let inserted = game
        .presenter()
        .count(|event| matches!(event, GameEvent::TileInserted { .. }));
    assert_eq!(inserted, 2);
}

#[test]
fn test_second_clear_confirmation_is_ignored() {
    let config = GameConfig::default();
    let mut game = GameManager::with_rng(config, EventLog::new(), StdRng::seed_from_u64(5));
    game.start_new_session(config);
    game.on_cleared();
    game.on_cleared();
    assert_eq!(game.grid().occupied_count(), 2);
}

#[test]
fn test_restart_removes_old_tiles_and_resets_score() {
    let mut game = game(GameType::PowerOf2, &[&[1, 1, 0], &[0, 0, 0], &[2, 0, 0]]);
    game.move_to(Direction::Left);
    assert!(game.score() > 0);
    let occupied = game.grid().occupied_count();
    game.presenter_mut().drain();

    let config = game.config();
    game.start_new_session(config);

    let removed = game
        .presenter()
        .count(|event| matches!(event, GameEvent::TileRemoved { .. }));
    assert_eq!(removed, occupied);
    assert_eq!(game.score(), 0);
    assert!(!game.is_won());
    assert!(!game.is_over());

    // Removals are reported before the clear itself.
    let events = game.presenter().events();
    let clear = events.iter().position(|e| *e == GameEvent::ClearBegun).unwrap();
    assert!(
        events[..clear]
            .iter()
            .all(|e| matches!(e, GameEvent::TileRemoved { .. }))
    );
}

#[test]
fn test_new_dimension_rebuilds_grid() {
    let config = GameConfig::new(4, GameType::PowerOf2).unwrap();
    let mut game = GameManager::with_rng(config, EventLog::new(), StdRng::seed_from_u64(2));
    game.start_new_session(config);
    game.on_cleared();

    let bigger = GameConfig::new(5, GameType::PowerOf3).unwrap();
    game.start_new_session(bigger);
    game.on_cleared();

    assert_eq!(game.grid().dimension(), 5);
    assert_eq!(game.grid().cells().count(), 25);
    assert_eq!(game.rules().game_type(), GameType::PowerOf3);
    assert_eq!(game.grid().occupied_count(), 2);
}

// ─────────────────────────────────────────────────────────────
//  Winning
// ─────────────────────────────────────────────────────────────

#[test]
fn test_win_is_reported_once() {
    let mut game = game(GameType::PowerOf2, &[&[9, 9, 0], &[9, 9, 0], &[0, 0, 0]]);

    // Both rows reach the winning level in the same move.
    game.move_to(Direction::Left);
    assert!(game.is_won());
    assert!(game.keep_playing());
    assert_eq!(count(&game, GameEvent::GameWon), 1);

    for direction in [Direction::Up, Direction::Left, Direction::Down, Direction::Right] {
        game.move_to(direction);
    }
    assert_eq!(count(&game, GameEvent::GameWon), 1);
}

#[test]
fn test_play_continues_after_win() {
    let mut game = game(GameType::Fibonacci, &[&[8, 9, 0], &[0, 0, 0], &[0, 0, 0]]);
    game.move_to(Direction::Left);

    assert!(game.is_won());
    assert_eq!(game.phase(), SessionPhase::Idle);
    let score = game.score();

    game.move_to(Direction::Right);
    assert!(game.score() > score);
}

// ─────────────────────────────────────────────────────────────
//  Game over
// ─────────────────────────────────────────────────────────────

#[test]
fn test_full_board_without_matches_is_terminal() {
    let mut game = game(GameType::PowerOf2, &[&[1, 2, 1], &[2, 1, 2], &[1, 2, 1]]);
    assert!(!game.moves_available());
    assert!(!game.adjacent_matches_available());

    game.move_to(Direction::Up);

    assert!(game.is_over());
    assert_eq!(game.phase(), SessionPhase::Over);
    assert_eq!(count(&game, GameEvent::GameOver), 1);
    assert_eq!(game.score(), 0);

    // Further moves are ignored.
    game.move_to(Direction::Down);
    assert_eq!(count(&game, GameEvent::GameOver), 1);
}

#[test]
fn test_full_board_with_match_is_not_terminal() {
    let game = game(GameType::PowerOf2, &[&[1, 2, 1], &[2, 1, 2], &[1, 2, 2]]);
    assert!(game.adjacent_matches_available());
    assert!(game.moves_available());
}

#[test]
fn test_power_of_three_needs_three_in_a_row() {
    let pair = game(GameType::PowerOf3, &[&[1, 1, 2], &[2, 3, 1], &[1, 2, 3]]);
    assert!(!pair.moves_available());

    let triple = game(GameType::PowerOf3, &[&[1, 2, 3], &[1, 3, 2], &[1, 2, 3]]);
    assert!(triple.moves_available());
}

#[test]
fn test_fibonacci_neighbours_count_as_matches() {
    let game = game(GameType::Fibonacci, &[&[1, 3, 1], &[3, 1, 3], &[1, 3, 2]]);
    assert!(game.adjacent_matches_available());
}

//! Property tests: merge rules and whole-game bookkeeping.

mod common;

use common::replay;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use strictly_fibonacci::invariants::{InvariantSet, SessionInvariants};
use strictly_fibonacci::{
    Direction, EventLog, GameConfig, GameManager, GameType, NO_MERGE, NoopPresenter, RuleSet,
};

fn game_type() -> impl Strategy<Value = GameType> {
    prop_oneof![
        Just(GameType::PowerOf2),
        Just(GameType::PowerOf3),
        Just(GameType::Fibonacci),
    ]
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Left),
        Just(Direction::Down),
        Just(Direction::Right),
    ]
}

proptest! {
    #[test]
    fn merging_is_commutative(kind in game_type(), a in 0u32..64, b in 0u32..64) {
        let rules = RuleSet::new(kind, 4);
        prop_assert_eq!(rules.merge_result_level(a, b), rules.merge_result_level(b, a));
    }

    #[test]
    fn merges_only_go_up(kind in game_type(), a in 1u32..64, b in 1u32..64) {
        let rules = RuleSet::new(kind, 4);
        let level = rules.merge_result_level(a, b);
        prop_assert!(level == NO_MERGE || level > a.max(b));
        prop_assert_eq!(level != NO_MERGE, rules.is_mergeable(a, b));
    }

    #[test]
    fn values_increase_with_level(kind in game_type(), level in 1u32..30) {
        let rules = RuleSet::new(kind, 4);
        prop_assert!(rules.value(level + 1) >= rules.value(level));
    }

    #[test]
    fn random_play_keeps_bookkeeping(
        kind in game_type(),
        dimension in 3usize..=5,
        seed in any::<u64>(),
        moves in prop::collection::vec(direction(), 1..80),
    ) {
        let config = GameConfig::new(dimension, kind).unwrap();
        let mut game = GameManager::with_rng(config, NoopPresenter, StdRng::seed_from_u64(seed));
        game.start_new_session(config);
        game.on_cleared();

        let mut last_score = game.score();
        for direction in moves {
            game.move_to(direction);

            prop_assert!(SessionInvariants::check_all(&game).is_ok());
            prop_assert_eq!(game.live_tiles(), game.grid().occupied_count());
            prop_assert!(game.score() >= last_score);
            prop_assert_eq!(game.is_over(), !game.moves_available());
            last_score = game.score();
        }
    }

    #[test]
    fn reported_events_rebuild_the_board(
        kind in game_type(),
        dimension in 3usize..=5,
        seed in any::<u64>(),
        moves in prop::collection::vec(direction(), 1..80),
    ) {
        let config = GameConfig::new(dimension, kind).unwrap();
        let mut game = GameManager::with_rng(config, EventLog::new(), StdRng::seed_from_u64(seed));
        game.start_new_session(config);
        game.on_cleared();

        let empty = vec![vec![0; dimension]; dimension];
        prop_assert_eq!(replay(&empty, game.presenter().events()), game.grid().levels());
        for direction in moves {
            game.move_to(direction);
            prop_assert_eq!(replay(&empty, game.presenter().events()), game.grid().levels());
        }
    }
}

//! Session orchestration: starting games and resolving moves.
//!
//! [`GameManager`] owns the grid and the score, resolves one move at a time
//! against the configured [`RuleSet`], and reports every visible change to
//! its [`Presenter`].

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::events::Presenter;
use crate::grid::Grid;
use crate::position::{Direction, Position};
use crate::rules::{GameType, NO_MERGE, RuleSet};
use crate::tile::Tile;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No session has been started yet.
    Setup,
    /// The board was cleared; waiting for the presenter to confirm before
    /// the opening tiles are placed.
    Clearing,
    /// Accepting moves. A won game stays here so the player can keep going.
    Idle,
    /// No moves remain.
    Over,
}

/// Runs one game session after another.
#[derive(Debug)]
pub struct GameManager<P> {
    config: GameConfig,
    rules: RuleSet,
    grid: Grid,
    phase: SessionPhase,
    score: u64,
    pending_score: u64,
    over: bool,
    won: bool,
    keep_playing: bool,
    live_tiles: usize,
    /// Tiles merged away during the current move, committed after the
    /// survivors.
    retired: Vec<Tile>,
    rng: StdRng,
    presenter: P,
}

impl<P: Presenter> GameManager<P> {
    /// Creates a manager seeded from the operating system.
    ///
    /// No session is running until [`start_new_session`](Self::start_new_session).
    pub fn new(config: GameConfig, presenter: P) -> Self {
        Self::with_rng(config, presenter, StdRng::from_os_rng())
    }

    /// Creates a manager with a caller-supplied random source.
    #[instrument(skip(presenter, rng))]
    pub fn with_rng(config: GameConfig, presenter: P, rng: StdRng) -> Self {
        Self {
            config,
            rules: config.rules(),
            grid: Grid::new(config.dimension()),
            phase: SessionPhase::Setup,
            score: 0,
            pending_score: 0,
            over: false,
            won: false,
            keep_playing: false,
            live_tiles: 0,
            retired: Vec::new(),
            rng,
            presenter,
        }
    }

    /// Resumes play on an existing board, with a score of 0.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the grid's dimension differs from the
    /// configuration's.
    #[track_caller]
    #[instrument(skip(grid, presenter, rng))]
    pub fn from_grid(
        config: GameConfig,
        grid: Grid,
        presenter: P,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        if grid.dimension() != config.dimension() {
            return Err(ConfigError::new(format!(
                "Grid is {0}x{0} but the config asks for {1}x{1}",
                grid.dimension(),
                config.dimension()
            )));
        }
        let mut manager = Self::with_rng(config, presenter, rng);
        manager.live_tiles = grid.occupied_count();
        manager.grid = grid;
        manager.phase = SessionPhase::Idle;
        Ok(manager)
    }

    // ─────────────────────────────────────────────────────────────
    //  Session lifecycle
    // ─────────────────────────────────────────────────────────────

    /// Starts a new session with the given configuration.
    ///
    /// Clears the board, rebuilds it if the dimension changed and resets the
    /// score and flags. The opening two tiles are placed once the presenter
    /// calls [`on_cleared`](Self::on_cleared).
    #[instrument(skip(self))]
    pub fn start_new_session(&mut self, config: GameConfig) {
        self.begin_clear();

        if self.grid.dimension() != config.dimension() {
            debug!(
                old = self.grid.dimension(),
                new = config.dimension(),
                "Rebuilding grid for new dimension"
            );
            self.grid = Grid::new(config.dimension());
        }
        self.config = config;
        self.rules = config.rules();

        self.score = 0;
        self.pending_score = 0;
        self.over = false;
        self.won = false;
        self.keep_playing = false;
        self.presenter.on_score_changed(0);

        info!(
            dimension = config.dimension(),
            game_type = %config.game_type(),
            "New session started"
        );
    }

    /// Takes every tile off the board and waits for the presenter.
    ///
    /// The engine's own state is cleared before this returns. No tile is
    /// spawned until [`on_cleared`](Self::on_cleared) is called, so a
    /// renderer can finish animating the removals first.
    #[instrument(skip(self))]
    pub fn begin_clear(&mut self) {
        for tile in self.grid.remove_all_tiles() {
            self.presenter.on_tile_removed(tile.cell());
        }
        self.retired.clear();
        self.live_tiles = 0;
        self.phase = SessionPhase::Clearing;
        self.presenter.on_clear_begun();
    }

    /// Confirms that the presenter has finished clearing, and places the
    /// opening two tiles.
    ///
    /// Ignored unless a clear is pending.
    #[instrument(skip(self))]
    pub fn on_cleared(&mut self) {
        if self.phase != SessionPhase::Clearing {
            debug!(phase = ?self.phase, "No clear pending; ignoring");
            return;
        }
        self.insert_random_tile();
        self.insert_random_tile();
        self.phase = SessionPhase::Idle;
        #[cfg(debug_assertions)]
        self.verify_invariants();
    }

    // ─────────────────────────────────────────────────────────────
    //  Moves
    // ─────────────────────────────────────────────────────────────

    /// Slides every tile as far as it goes in `direction`, merging where the
    /// rules allow.
    ///
    /// A move that neither slides nor merges anything changes nothing. Moves
    /// are ignored while no session is accepting them.
    #[instrument(skip(self), fields(game_type = %self.rules.game_type()))]
    pub fn move_to(&mut self, direction: Direction) {
        if self.phase != SessionPhase::Idle {
            debug!(phase = ?self.phase, "Move ignored");
            return;
        }

        let reverse = direction.is_reverse();
        let unit = direction.unit();
        let dimension = self.grid.dimension();

        for position in self.grid.positions(reverse) {
            if self.grid.tile_at(position).is_none() {
                continue;
            }

            // Find the farthest cell this tile can reach.
            let source = direction.coordinate(position);
            let mut target = source;
            let mut i = source + unit;

            while direction.in_travel_range(i, dimension) {
                let next = direction.along(position, i);
                if self.grid.tile_at(next).is_none() {
                    target = i;
                } else {
                    let level = match self.rules.game_type() {
                        GameType::PowerOf3 => {
                            let further = direction.along(position, i + unit);
                            self.merge_three(position, next, further)
                        }
                        GameType::PowerOf2 | GameType::Fibonacci => self.merge_two(position, next),
                    };

                    if level != NO_MERGE {
                        // The tile already travelled as part of the merge.
                        target = source;
                        self.pending_score = self.rules.value(level);
                    }
                    break;
                }
                i += unit;
            }

            if target != source {
                self.grid.relocate(position, direction.along(position, target));
                self.pending_score = self.pending_score.saturating_add(1);
            }
        }

        if self.pending_score < 1 {
            debug!(%direction, "Nothing moved");
            if !self.over && !self.moves_available() {
                self.finish_game();
            }
            return;
        }

        self.commit(reverse);
        self.materialize_pending_score();

        if self.won && !self.keep_playing {
            // The player may carry on past the win; only report it once.
            self.keep_playing = true;
            info!(score = self.score, "Winning level reached");
            self.presenter.on_game_won();
        }

        for _ in 0..self.config.tiles_per_move() {
            self.insert_random_tile();
        }

        if !self.moves_available() {
            self.finish_game();
        }

        #[cfg(debug_assertions)]
        self.verify_invariants();
    }

    /// Merges the tile at `source` into the one at `target`.
    ///
    /// Returns the resulting level, or [`NO_MERGE`].
    fn merge_two(&mut self, source: Position, target: Position) -> u32 {
        let (Some(mover), Some(blocker)) = (self.grid.tile_at(source), self.grid.tile_at(target))
        else {
            return NO_MERGE;
        };
        // In 2 2 4 moving towards the 4, the new 4 must not merge again.
        if blocker.has_pending_merge() {
            return NO_MERGE;
        }

        let level = self.rules.merge_result_level(mover.level(), blocker.level());
        if level == NO_MERGE {
            return NO_MERGE;
        }

        // The blocker leaves before the mover arrives, so the reports replay
        // cleanly against a map of positions.
        self.retire_at(target);
        self.grid.relocate(source, target);
        self.absorb_at(target, level);
        debug!(from = %source, to = %target, level, "Merged two tiles");
        level
    }

    /// Merges the tile at `source` with the two tiles lined up after it,
    /// ending at `far`.
    ///
    /// Both neighbouring pairs must be mergeable; the result is the smaller
    /// of the two pairwise levels. Returns the resulting level, or
    /// [`NO_MERGE`].
    fn merge_three(&mut self, source: Position, near: Position, far: Position) -> u32 {
        let (Some(mover), Some(middle), Some(last)) = (
            self.grid.tile_at(source),
            self.grid.tile_at(near),
            self.grid.tile_at(far),
        ) else {
            return NO_MERGE;
        };
        if middle.has_pending_merge() || last.has_pending_merge() {
            return NO_MERGE;
        }

        let level = self
            .rules
            .merge_three_result_level(mover.level(), middle.level(), last.level());
        if level == NO_MERGE {
            return NO_MERGE;
        }

        // The middle tile travels to the far cell too, then both vanish.
        self.retire_at(far);
        self.grid.relocate(near, far);
        self.retire_at(far);
        self.grid.relocate(source, far);
        self.absorb_at(far, level);
        debug!(from = %source, to = %far, level, "Merged three tiles");
        level
    }

    /// Takes the tile at `position` off the board as merged away.
    fn retire_at(&mut self, position: Position) {
        let Some(mut tile) = self.grid.take_tile(position) else {
            return;
        };
        let seq = self.grid.stamp();
        tile.queue_remove(seq);
        self.live_tiles -= 1;
        self.retired.push(tile);
    }

    fn absorb_at(&mut self, position: Position, level: u32) {
        let seq = self.grid.stamp();
        if let Some(merged) = self.grid.tile_at_mut(position) {
            merged.absorb_merge(level, seq);
        }
    }

    /// Hands every queued tile action to the presenter, oldest first, and
    /// checks for a win.
    fn commit(&mut self, reverse: bool) {
        let winning_level = self.rules.winning_level();
        let mut actions = Vec::new();

        for position in self.grid.positions(reverse) {
            if let Some(tile) = self.grid.tile_at_mut(position) {
                actions.extend(tile.settle());
                if tile.level() >= winning_level {
                    self.won = true;
                }
            }
        }
        for mut tile in self.retired.drain(..) {
            actions.extend(tile.settle());
        }

        actions.sort_by_key(|(seq, _)| *seq);
        debug!(count = actions.len(), "Reporting tile actions");
        for (_, action) in actions {
            action.report(&mut self.presenter);
        }
    }

    fn materialize_pending_score(&mut self) {
        self.score = self.score.saturating_add(self.pending_score);
        debug!(gained = self.pending_score, score = self.score, "Score updated");
        self.pending_score = 0;
        self.presenter.on_score_changed(self.score);
    }

    fn insert_random_tile(&mut self) {
        let game_type = self.rules.game_type();
        let Some(tile) = self.grid.insert_random_tile(game_type, &mut self.rng) else {
            debug!("Board full; no tile inserted");
            return;
        };
        let (position, level) = (tile.cell(), tile.level());
        self.live_tiles += 1;
        self.presenter.on_tile_inserted(position, level);
    }

    fn finish_game(&mut self) {
        self.over = true;
        self.phase = SessionPhase::Over;
        info!(score = self.score, "No moves left");
        self.presenter.on_game_over();
    }

    // ─────────────────────────────────────────────────────────────
    //  State checkers
    // ─────────────────────────────────────────────────────────────

    /// Whether any move can change the board: an empty cell, or two (three
    /// for powers of three) mergeable tiles side by side.
    #[instrument(skip(self))]
    pub fn moves_available(&self) -> bool {
        self.grid.has_available_cells() || self.adjacent_matches_available()
    }

    /// Whether some tiles sharing an edge could merge.
    ///
    /// Only neighbours to the right and below are checked; the left and
    /// above pairs are the same pairs seen from the other tile.
    pub fn adjacent_matches_available(&self) -> bool {
        let level_at = |x: i32, y: i32| self.grid.tile_at(Position::new(x, y)).map(Tile::level);
        let mergeable = |a: Option<u32>, b: Option<u32>| match (a, b) {
            (Some(a), Some(b)) => self.rules.is_mergeable(a, b),
            _ => false,
        };

        for position in self.grid.positions(false) {
            let (x, y) = (position.x, position.y);
            let here = level_at(x, y);
            if here.is_none() {
                continue;
            }

            let found = if self.rules.game_type() == GameType::PowerOf3 {
                (mergeable(here, level_at(x + 1, y)) && mergeable(level_at(x + 1, y), level_at(x + 2, y)))
                    || (mergeable(here, level_at(x, y + 1))
                        && mergeable(level_at(x, y + 1), level_at(x, y + 2)))
            } else {
                mergeable(here, level_at(x + 1, y)) || mergeable(here, level_at(x, y + 1))
            };
            if found {
                return true;
            }
        }

        false
    }

    #[cfg(debug_assertions)]
    fn verify_invariants(&self) {
        use crate::invariants::{InvariantSet, SessionInvariants};

        if let Err(violations) = SessionInvariants::check_all(self) {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            tracing::error!(%descriptions, "Session invariant violated");
            debug_assert!(violations.is_empty(), "Session invariant violated: {}", descriptions);
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Accessors
    // ─────────────────────────────────────────────────────────────

    /// Returns the configuration of the current session.
    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Returns the rules of the current session.
    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    /// Returns the board.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the session phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Returns the session score.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Whether the winning level has been reached this session.
    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Whether the game is over.
    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Whether play continues after a win.
    pub fn keep_playing(&self) -> bool {
        self.keep_playing
    }

    /// Number of tiles the session believes are on the board.
    pub fn live_tiles(&self) -> usize {
        self.live_tiles
    }

    /// Returns the presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Returns the presenter mutably.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Consumes the manager, returning its presenter.
    pub fn into_presenter(self) -> P {
        self.presenter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventLog, GameEvent};

    fn manager(game_type: GameType, rows: &[&[u32]]) -> GameManager<EventLog> {
        let grid = Grid::from_levels(rows).unwrap();
        let config = GameConfig::new(grid.dimension(), game_type).unwrap();
        GameManager::from_grid(config, grid, EventLog::new(), StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn test_slide_scores_one_per_moving_tile() {
        let mut game = manager(GameType::PowerOf2, &[&[1, 0, 0], &[0, 0, 0], &[0, 0, 2]]);
        game.move_to(Direction::Right);

        assert_eq!(game.grid().tile_at(Position::new(0, 2)).map(Tile::level), Some(1));
        assert_eq!(game.grid().tile_at(Position::new(2, 2)).map(Tile::level), Some(2));
        // One tile slid, the other was already at the wall.
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn test_merge_replaces_pending_score_with_value() {
        // Right scan visits (0,2) then (0,1): (0,1) merges into (0,2).
        let mut game = manager(GameType::PowerOf2, &[&[0, 2, 2], &[0, 0, 0], &[0, 0, 0]]);
        game.move_to(Direction::Right);

        assert_eq!(game.grid().tile_at(Position::new(0, 2)).map(Tile::level), Some(3));
        assert!(game.presenter().events().contains(&GameEvent::TileMoved {
            from: Position::new(0, 1),
            to: Position::new(0, 2),
            level: 2,
        }));
        assert_eq!(game.score(), 8);
    }

    #[test]
    fn test_merged_tile_does_not_merge_again() {
        let mut game = manager(GameType::PowerOf2, &[&[3, 2, 2], &[0, 0, 0], &[0, 0, 0]]);
        game.move_to(Direction::Right);

        // The two 2s become a 3; the old 3 slides up to it but stays apart.
        let at = |y| game.grid().tile_at(Position::new(0, y)).map(Tile::level);
        assert_eq!(at(1), Some(3));
        assert_eq!(at(2), Some(3));
        assert_eq!(game.score(), 8 + 1);
    }

    #[test]
    fn test_three_way_merge_lands_at_far_cell() {
        let mut game = manager(GameType::PowerOf3, &[&[2, 2, 2], &[0, 0, 0], &[0, 0, 0]]);
        game.move_to(Direction::Right);

        assert_eq!(game.grid().tile_at(Position::new(0, 2)).map(Tile::level), Some(3));
        // The merged tile plus the one spawned after the move.
        assert_eq!(game.live_tiles(), 2);
        assert_eq!(game.score(), 27);
    }

    #[test]
    fn test_power_of_three_ignores_pairs() {
        let mut game = manager(GameType::PowerOf3, &[&[0, 2, 2], &[1, 0, 0], &[0, 0, 0]]);
        game.move_to(Direction::Right);

        let at = |x, y| game.grid().tile_at(Position::new(x, y)).map(Tile::level);
        assert_eq!(at(0, 1), Some(2));
        assert_eq!(at(0, 2), Some(2));
        assert_eq!(at(1, 2), Some(1));
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn test_live_tiles_follow_merges_and_spawns() {
        let mut game = manager(GameType::PowerOf2, &[&[1, 1, 0], &[0, 0, 0], &[0, 0, 0]]);
        assert_eq!(game.live_tiles(), 2);
        game.move_to(Direction::Left);
        // One merge, one spawn.
        assert_eq!(game.live_tiles(), 2);
        assert_eq!(game.live_tiles(), game.grid().occupied_count());
    }

    #[test]
    fn test_moves_ignored_before_first_session() {
        let config = GameConfig::default();
        let mut game = GameManager::with_rng(config, EventLog::new(), StdRng::seed_from_u64(1));
        game.move_to(Direction::Up);
        assert_eq!(game.phase(), SessionPhase::Setup);
        assert!(game.presenter().events().is_empty());
    }

    #[test]
    fn test_from_grid_rejects_dimension_mismatch() {
        let grid = Grid::new(3);
        let config = GameConfig::new(4, GameType::PowerOf2).unwrap();
        let result = GameManager::from_grid(config, grid, EventLog::new(), StdRng::seed_from_u64(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_commit_reports_removal_before_merge() {
        let mut game = manager(GameType::PowerOf2, &[&[0, 0, 0], &[0, 0, 0], &[1, 1, 0]]);
        game.move_to(Direction::Left);

        let events = game.presenter().events();
        assert_eq!(
            &events[..3],
            &[
                GameEvent::TileRemoved {
                    position: Position::new(2, 0),
                },
                GameEvent::TileMoved {
                    from: Position::new(2, 1),
                    to: Position::new(2, 0),
                    level: 1,
                },
                GameEvent::TileLevelChanged {
                    position: Position::new(2, 0),
                    level: 2,
                },
            ]
        );
    }

    #[test]
    fn test_three_way_merge_report_order() {
        let mut game = manager(GameType::PowerOf3, &[&[1, 1, 1], &[0, 0, 0], &[0, 0, 0]]);
        game.move_to(Direction::Right);

        let far = Position::new(0, 2);
        assert_eq!(
            &game.presenter().events()[..5],
            &[
                GameEvent::TileRemoved { position: far },
                GameEvent::TileMoved {
                    from: Position::new(0, 1),
                    to: far,
                    level: 1,
                },
                GameEvent::TileRemoved { position: far },
                GameEvent::TileMoved {
                    from: Position::new(0, 0),
                    to: far,
                    level: 1,
                },
                GameEvent::TileLevelChanged {
                    position: far,
                    level: 2,
                },
            ]
        );
    }

    #[test]
    fn test_score_saturates_on_huge_levels() {
        let mut game = manager(GameType::PowerOf2, &[&[64, 64, 0], &[0, 0, 1], &[0, 0, 0]]);
        game.move_to(Direction::Left);

        assert_eq!(game.grid().tile_at(Position::new(0, 0)).map(Tile::level), Some(65));
        assert_eq!(game.score(), u64::MAX);

        game.move_to(Direction::Right);
        assert_eq!(game.score(), u64::MAX);
    }
}

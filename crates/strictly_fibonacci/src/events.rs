//! The seam between the engine and whatever draws the game.
//!
//! The engine never renders anything. It reports what changed through a
//! [`Presenter`], which gets enough per-tile detail to animate the board
//! without reading engine internals.

use crate::position::Position;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Receives everything the engine reports.
///
/// Every method has a no-op default so implementors only override what they
/// draw.
pub trait Presenter {
    /// The session score changed.
    fn on_score_changed(&mut self, _score: u64) {}

    /// A tile reached the winning level for the first time this session.
    fn on_game_won(&mut self) {}

    /// No moves remain.
    fn on_game_over(&mut self) {}

    /// A new tile appeared.
    fn on_tile_inserted(&mut self, _position: Position, _level: u32) {}

    /// A tile slid from one cell to another.
    fn on_tile_moved(&mut self, _from: Position, _to: Position, _level: u32) {}

    /// A tile left the board.
    fn on_tile_removed(&mut self, _position: Position) {}

    /// A tile changed level after a merge.
    fn on_tile_level_changed(&mut self, _position: Position, _level: u32) {}

    /// The board was cleared. The engine will not spawn tiles for the new
    /// session until the presenter calls
    /// [`GameManager::on_cleared`](crate::GameManager::on_cleared).
    fn on_clear_begun(&mut self) {}
}

/// Presenter that ignores every report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopPresenter;

impl Presenter for NoopPresenter {}

/// One report from the engine, as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// See [`Presenter::on_score_changed`].
    ScoreChanged {
        /// New session score.
        score: u64,
    },
    /// See [`Presenter::on_game_won`].
    GameWon,
    /// See [`Presenter::on_game_over`].
    GameOver,
    /// See [`Presenter::on_tile_inserted`].
    TileInserted {
        /// Cell of the new tile.
        position: Position,
        /// Level of the new tile.
        level: u32,
    },
    /// See [`Presenter::on_tile_moved`].
    TileMoved {
        /// Cell the tile left.
        from: Position,
        /// Cell the tile entered.
        to: Position,
        /// Level while sliding.
        level: u32,
    },
    /// See [`Presenter::on_tile_removed`].
    TileRemoved {
        /// Last cell of the tile.
        position: Position,
    },
    /// See [`Presenter::on_tile_level_changed`].
    TileLevelChanged {
        /// Cell of the tile.
        position: Position,
        /// New level.
        level: u32,
    },
    /// See [`Presenter::on_clear_begun`].
    ClearBegun,
}

/// Presenter that records every report in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Takes the recorded events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Counts recorded events matching a predicate.
    pub fn count(&self, predicate: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }

    /// Returns the most recent score report, if any.
    pub fn last_score(&self) -> Option<u64> {
        self.events.iter().rev().find_map(|event| match event {
            GameEvent::ScoreChanged { score } => Some(*score),
            _ => None,
        })
    }

    fn record(&mut self, event: GameEvent) {
        trace!(?event, "Recording game event");
        self.events.push(event);
    }
}

impl Presenter for EventLog {
    fn on_score_changed(&mut self, score: u64) {
        self.record(GameEvent::ScoreChanged { score });
    }

    fn on_game_won(&mut self) {
        self.record(GameEvent::GameWon);
    }

    fn on_game_over(&mut self) {
        self.record(GameEvent::GameOver);
    }

    fn on_tile_inserted(&mut self, position: Position, level: u32) {
        self.record(GameEvent::TileInserted { position, level });
    }

    fn on_tile_moved(&mut self, from: Position, to: Position, level: u32) {
        self.record(GameEvent::TileMoved { from, to, level });
    }

    fn on_tile_removed(&mut self, position: Position) {
        self.record(GameEvent::TileRemoved { position });
    }

    fn on_tile_level_changed(&mut self, position: Position, level: u32) {
        self.record(GameEvent::TileLevelChanged { position, level });
    }

    fn on_clear_begun(&mut self) {
        self.record(GameEvent::ClearBegun);
    }
}

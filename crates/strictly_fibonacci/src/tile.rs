//! Tiles and the commands they queue during a move.
//!
//! A tile's own state (level, owning cell) changes immediately while a move
//! is being resolved, because later tiles in the scan must see where earlier
//! ones went. What a renderer needs to animate that change is queued as
//! [`TileAction`] commands and handed to the [`Presenter`] when the move is
//! committed.
//!
//! Every queued action carries a grid-wide sequence number, so the commands
//! of all tiles can be reported in the order they happened. Replaying them
//! in that order against a map of positions reproduces the board.

use crate::events::Presenter;
use crate::position::Position;
use crate::rules::GameType;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Stable identity of a tile within a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u64);

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A state transition of one tile, queued during a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileAction {
    /// The tile slid from one cell to another.
    MoveTo {
        /// Cell the tile left.
        from: Position,
        /// Cell the tile now occupies.
        to: Position,
        /// Level the tile had while sliding.
        level: u32,
    },
    /// The tile absorbed a merge and now shows a new level.
    SetLevel {
        /// Cell the tile occupies.
        position: Position,
        /// The new level.
        level: u32,
    },
    /// The tile was merged away and left the board.
    Remove {
        /// Last cell the tile was seen in.
        position: Position,
    },
}

impl TileAction {
    /// Hands this action to the matching presenter callback.
    pub(crate) fn report<P: Presenter + ?Sized>(self, presenter: &mut P) {
        match self {
            TileAction::MoveTo { from, to, level } => presenter.on_tile_moved(from, to, level),
            TileAction::SetLevel { position, level } => {
                presenter.on_tile_level_changed(position, level)
            }
            TileAction::Remove { position } => presenter.on_tile_removed(position),
        }
    }
}

/// A queued action and the sequence number it was queued under.
pub(crate) type Stamped = (u64, TileAction);

/// One numbered game piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    level: u32,
    /// Position of the owning cell. A lookup key, not ownership: the cell
    /// owns the tile.
    cell: Position,
    pending_merge: bool,
    pending: Vec<Stamped>,
}

impl Tile {
    /// Creates a tile at the given cell.
    pub(crate) fn new(id: TileId, level: u32, cell: Position) -> Self {
        Self {
            id,
            level,
            cell,
            pending_merge: false,
            pending: Vec::new(),
        }
    }

    /// Picks the level of a freshly spawned tile.
    ///
    /// Fibonacci games need roughly as many 2s as 1s to stay playable, so
    /// they spawn level 1 with probability 0.40; the other variants spawn
    /// level 1 with probability 0.95. Everything else is level 2.
    pub fn spawn_level<R: Rng + ?Sized>(game_type: GameType, rng: &mut R) -> u32 {
        let level_one_percent = match game_type {
            GameType::Fibonacci => 40,
            GameType::PowerOf2 | GameType::PowerOf3 => 95,
        };
        if rng.random_range(0..100) < level_one_percent {
            1
        } else {
            2
        }
    }

    /// Returns the tile's identity.
    pub fn id(&self) -> TileId {
        self.id
    }

    /// Returns the tile's level.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Returns the position of the cell holding this tile.
    pub fn cell(&self) -> Position {
        self.cell
    }

    /// Whether this tile already absorbed a merge during the current move.
    pub fn has_pending_merge(&self) -> bool {
        self.pending_merge
    }

    /// Returns the actions queued since the last commit, oldest first.
    pub fn pending_actions(&self) -> impl Iterator<Item = &TileAction> {
        self.pending.iter().map(|(_, action)| action)
    }

    /// Records that the tile now lives in `to`.
    pub(crate) fn queue_move(&mut self, to: Position, seq: u64) {
        self.pending.push((
            seq,
            TileAction::MoveTo {
                from: self.cell,
                to,
                level: self.level,
            },
        ));
        self.cell = to;
    }

    /// Raises the tile to `level` as the result of a merge.
    pub(crate) fn absorb_merge(&mut self, level: u32, seq: u64) {
        self.level = level;
        self.pending_merge = true;
        self.pending.push((
            seq,
            TileAction::SetLevel {
                position: self.cell,
                level,
            },
        ));
    }

    /// Marks the tile as merged away.
    pub(crate) fn queue_remove(&mut self, seq: u64) {
        self.pending.push((
            seq,
            TileAction::Remove {
                position: self.cell,
            },
        ));
    }

    /// Takes the queued actions and settles the tile for the next move.
    #[instrument(skip(self), fields(tile = %self.id))]
    pub(crate) fn settle(&mut self) -> Vec<Stamped> {
        self.pending_merge = false;
        std::mem::take(&mut self.pending)
    }
}

//! Settled invariant: nothing from a move is left uncommitted.

use super::Invariant;
use crate::events::Presenter;
use crate::manager::GameManager;

/// Invariant: between moves no tile carries a merge flag or queued actions.
///
/// A leftover merge flag would stop that tile from merging on the next
/// move; leftover actions would reach the presenter a move late.
pub struct SettledTilesInvariant;

impl<P: Presenter> Invariant<GameManager<P>> for SettledTilesInvariant {
    fn holds(game: &GameManager<P>) -> bool {
        game.grid()
            .tiles()
            .all(|tile| !tile.has_pending_merge() && tile.pending_actions().next().is_none())
    }

    fn description() -> &'static str {
        "No tile has an uncommitted merge or action between moves"
    }
}

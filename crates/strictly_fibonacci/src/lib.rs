//! Strictly Fibonacci - tile-merging game logic
//!
//! The game-state engine behind a 2048-style puzzle with three numbering
//! variants: powers of two, powers of three (three tiles in a row merge) and
//! Fibonacci (neighbouring Fibonacci numbers merge).
//!
//! # Architecture
//!
//! - **Rules**: pure functions over tile levels ([`RuleSet`])
//! - **Grid**: the board of [`Cell`]s, each owning at most one [`Tile`]
//! - **Manager**: resolves moves, keeps score, detects win and game over
//!   ([`GameManager`])
//! - **Presenter**: the seam through which a renderer learns what changed
//!
//! # Example
//!
//! ```
//! use strictly_fibonacci::{Direction, EventLog, GameConfig, GameManager, GameType};
//!
//! # fn example() -> Result<(), strictly_fibonacci::ConfigError> {
//! let config = GameConfig::new(4, GameType::Fibonacci)?;
//! let mut game = GameManager::new(config, EventLog::new());
//!
//! game.start_new_session(config);
//! // A renderer would animate the cleared board first.
//! game.on_cleared();
//!
//! game.move_to(Direction::Left);
//! assert!(game.live_tiles() >= 2);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod events;
mod grid;
pub mod invariants;
mod manager;
mod position;
mod rules;
mod tile;

// Crate-level exports - Configuration
pub use config::{DEFAULT_DIMENSION, GameConfig, SUPPORTED_DIMENSIONS};
pub use error::ConfigError;

// Crate-level exports - Rules
pub use rules::{GameType, NO_MERGE, RuleSet, winning_level};

// Crate-level exports - Board
pub use grid::{Cell, Grid, Positions};
pub use position::{Direction, Position};
pub use tile::{Tile, TileAction, TileId};

// Crate-level exports - Sessions
pub use events::{EventLog, GameEvent, NoopPresenter, Presenter};
pub use manager::{GameManager, SessionPhase};

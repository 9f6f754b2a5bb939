//! Headless random play, for balancing and smoke testing.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use strictly_fibonacci::{Direction, GameConfig, GameManager, NoopPresenter, Tile};
use tracing::{debug, info, instrument};

/// Outcome of one simulated game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Index of the game within the batch.
    pub game: usize,
    /// Seed the game was played with.
    pub seed: u64,
    /// Final score.
    pub score: u64,
    /// Highest tile level on the final board.
    pub max_level: u32,
    /// Displayed value of that tile.
    pub max_value: u64,
    /// Moves attempted, including ones that changed nothing.
    pub moves: usize,
    /// Whether the winning level was reached.
    pub won: bool,
    /// Whether the game ended with no moves left rather than at the cap.
    pub finished: bool,
}

/// A batch of simulated games with aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// The configuration every game used.
    pub config: GameConfig,
    /// Per-game results.
    pub runs: Vec<RunSummary>,
    /// Mean final score.
    pub mean_score: f64,
    /// Highest final score.
    pub best_score: u64,
    /// Number of games that reached the winning level.
    pub wins: usize,
}

/// Plays one game with uniformly random directions.
#[instrument(skip(config))]
pub fn play_one(config: GameConfig, game: usize, seed: u64, max_moves: usize) -> RunSummary {
    let mut manager =
        GameManager::with_rng(config, NoopPresenter, StdRng::seed_from_u64(seed));
    manager.start_new_session(config);
    manager.on_cleared();

    let mut picker = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut moves = 0;
    while !manager.is_over() && moves < max_moves {
        let direction = Direction::ALL[picker.random_range(0..Direction::ALL.len())];
        manager.move_to(direction);
        moves += 1;
    }

    let max_level = manager.grid().tiles().map(Tile::level).max().unwrap_or(0);
    let summary = RunSummary {
        game,
        seed,
        score: manager.score(),
        max_level,
        max_value: manager.rules().value(max_level),
        moves,
        won: manager.is_won(),
        finished: manager.is_over(),
    };
    debug!(?summary, "Game finished");
    summary
}

/// Plays `games` games. Game `i` is seeded with `seed + 2 * i`.
#[instrument]
pub fn run(config: GameConfig, games: usize, seed: u64, max_moves: usize) -> SimulationReport {
    let runs: Vec<RunSummary> = (0..games)
        .map(|game| {
            let game_seed = seed.wrapping_add(2 * game as u64);
            play_one(config, game, game_seed, max_moves)
        })
        .collect();

    let total: u64 = runs.iter().map(|run| run.score).sum();
    let mean_score = if runs.is_empty() {
        0.0
    } else {
        total as f64 / runs.len() as f64
    };
    let best_score = runs.iter().map(|run| run.score).max().unwrap_or(0);
    let wins = runs.iter().filter(|run| run.won).count();

    info!(games, mean_score, best_score, wins, "Simulation complete");
    SimulationReport {
        config,
        runs,
        mean_score,
        best_score,
        wins,
    }
}

impl SimulationReport {
    /// Renders the report as a plain text table.
    pub fn to_table(&self) -> String {
        let mut out = format!(
            "{} on {}x{}\n{:>5} {:>10} {:>6} {:>10} {:>6} {:>4}\n",
            self.config.game_type(),
            self.config.dimension(),
            self.config.dimension(),
            "game",
            "score",
            "level",
            "value",
            "moves",
            "won"
        );
        for run in &self.runs {
            out.push_str(&format!(
                "{:>5} {:>10} {:>6} {:>10} {:>6} {:>4}\n",
                run.game,
                run.score,
                run.max_level,
                run.max_value,
                run.moves,
                if run.won { "yes" } else { "no" }
            ));
        }
        out.push_str(&format!(
            "mean {:.1}  best {}  wins {}/{}\n",
            self.mean_score,
            self.best_score,
            self.wins,
            self.runs.len()
        ));
        out
    }
}

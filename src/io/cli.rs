//! Command-line interface for seeded self-play sessions

use crate::game::session::SwapOutcome;
use crate::game::{Game, GameState};
use crate::io::configuration::{
    DEFAULT_BASE_POINTS_PER_TILE, DEFAULT_COMBO_MULTIPLIER, DEFAULT_GAMES, DEFAULT_GRID_HEIGHT,
    DEFAULT_GRID_WIDTH, DEFAULT_MAX_CASCADE_STEPS, DEFAULT_MIN_MATCH_LENGTH,
    DEFAULT_MOVES_PER_GAME, DEFAULT_SEED, DEFAULT_TYPE_COUNT, GameConfig,
};
use crate::io::error::Result;
use crate::io::persistence::{FileStore, HighScoreStore, MemoryStore};
use crate::io::progress::ProgressManager;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tilematch")]
#[command(
    author,
    version,
    about = "Play seeded tile-matching games by always taking the first available hint"
)]
/// Command-line arguments for the self-play driver
pub struct Cli {
    /// Random seed for reproducible boards and refills
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Number of grid columns
    #[arg(short = 'w', long, default_value_t = DEFAULT_GRID_WIDTH)]
    pub width: usize,

    /// Number of grid rows
    #[arg(short = 'H', long, default_value_t = DEFAULT_GRID_HEIGHT)]
    pub height: usize,

    /// Number of distinct tile types
    #[arg(short, long, default_value_t = DEFAULT_TYPE_COUNT)]
    pub types: usize,

    /// Minimum run length that counts as a match
    #[arg(short, long, default_value_t = DEFAULT_MIN_MATCH_LENGTH)]
    pub min_match: usize,

    /// Maximum swaps per game
    #[arg(short = 'n', long, default_value_t = DEFAULT_MOVES_PER_GAME)]
    pub moves: usize,

    /// Number of games to play
    #[arg(short, long, default_value_t = DEFAULT_GAMES)]
    pub games: usize,

    /// Points per matched tile before the combo multiplier
    #[arg(long, default_value_t = DEFAULT_BASE_POINTS_PER_TILE)]
    pub base_points: u32,

    /// Base of the exponential combo multiplier
    #[arg(long, default_value_t = DEFAULT_COMBO_MULTIPLIER)]
    pub combo_multiplier: f64,

    /// Maximum cascade steps resolved for one swap
    #[arg(long, default_value_t = DEFAULT_MAX_CASCADE_STEPS)]
    pub max_cascade_steps: usize,

    /// File holding the persistent high score (kept in memory when absent)
    #[arg(long, value_name = "FILE")]
    pub high_score_file: Option<PathBuf>,

    /// Let fresh boards contain matches before the first swap
    #[arg(long)]
    pub allow_initial_matches: bool,

    /// Suppress progress output and logging
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Session configuration described by the arguments
    pub fn to_config(&self) -> GameConfig {
        GameConfig {
            grid_width: self.width,
            grid_height: self.height,
            type_count: self.types,
            min_match_length: self.min_match,
            base_points_per_tile: self.base_points,
            combo_multiplier: self.combo_multiplier,
            max_cascade_steps: self.max_cascade_steps,
            allow_initial_matches: self.allow_initial_matches,
            ..GameConfig::default()
        }
    }
}

/// Install the stderr log subscriber
///
/// The filter comes from `RUST_LOG` and defaults to warnings only. `quiet`
/// disables logging altogether. Repeated calls keep the first subscriber.
pub fn init_logging(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Result of one self-played game
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSummary {
    /// Zero-based index of the game in the run
    pub index: usize,
    /// Swaps that were played
    pub moves_played: usize,
    /// Final score
    pub score: u64,
    /// High score after the game
    pub high_score: u64,
    /// Longest cascade chain triggered by a single swap
    pub longest_chain: usize,
    /// Whether the game ended because no swap could create a match
    pub stalled: bool,
}

/// Plays the requested games and reports their results
pub struct SessionRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl SessionRunner {
    /// Create a runner for the given arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Play every game and print one summary line per game
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the high score cannot be
    /// loaded or saved
    // Summary lines are the program's output
    #[allow(clippy::print_stdout)]
    pub fn run(&mut self) -> Result<()> {
        let summaries = self.play()?;
        for summary in &summaries {
            let stalled = if summary.stalled { " (no moves left)" } else { "" };
            println!(
                "game {}: {} moves, score {}, longest chain {}, high score {}{stalled}",
                summary.index + 1,
                summary.moves_played,
                summary.score,
                summary.longest_chain,
                summary.high_score,
            );
        }
        Ok(())
    }

    /// Play every game and return their summaries
    ///
    /// All games share one session, so the high score carries over between them.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the high score cannot be
    /// loaded or saved
    pub fn play(&mut self) -> Result<Vec<GameSummary>> {
        let store: Box<dyn HighScoreStore> = match self.cli.high_score_file {
            Some(ref path) => Box::new(FileStore::new(path)),
            None => Box::new(MemoryStore::default()),
        };
        let mut game = Game::new(self.cli.to_config(), store, self.cli.seed)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(self.cli.games);
        }

        let mut summaries = Vec::with_capacity(self.cli.games);
        for index in 0..self.cli.games {
            summaries.push(self.play_game(&mut game, index)?);
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }
        game.teardown()?;
        Ok(summaries)
    }

    fn play_game(
        &mut self,
        game: &mut Game<Box<dyn HighScoreStore>>,
        index: usize,
    ) -> Result<GameSummary> {
        if game.state() != GameState::Menu {
            let _ = game.return_to_menu()?;
        }
        let _ = game.start_game()?;
        if let Some(ref mut pm) = self.progress_manager {
            pm.start_game(index, self.cli.moves);
        }

        let mut moves_played = 0;
        let mut longest_chain = 0;
        let mut stalled = false;
        while moves_played < self.cli.moves {
            let Some(hint) = game.hint()? else {
                stalled = true;
                break;
            };
            if let SwapOutcome::Resolved(report) = game.swap(hint.from, hint.to)? {
                longest_chain = longest_chain.max(report.chain_length());
                if report.truncated {
                    warn!(game = index + 1, "Cascade truncated at the step limit");
                }
            }
            moves_played += 1;
            let _ = game.drain_events();

            if let Some(ref mut pm) = self.progress_manager {
                pm.update_game(index, moves_played, game.score().current_score());
            }
        }

        let _ = game.end_game()?;
        let _ = game.drain_events();
        let summary = GameSummary {
            index,
            moves_played,
            score: game.score().current_score(),
            high_score: game.score().high_score(),
            longest_chain,
            stalled,
        };
        info!(
            game = index + 1,
            moves = summary.moves_played,
            score = summary.score,
            stalled,
            "Game finished"
        );

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_game(index, summary.score);
        }
        Ok(summary)
    }
}

//! Combo-aware scoring and high-score tracking
//!
//! Points for a clear are `base * tiles * multiplier^combo`, rounded half to even.
//! The combo counts cascade steps within one swap, so every further step in a
//! chain multiplies the reward geometrically.

use tracing::{debug, info};

use crate::io::configuration::{DEFAULT_BASE_POINTS_PER_TILE, DEFAULT_COMBO_MULTIPLIER};
use crate::io::error::Result;
use crate::io::persistence::HighScoreStore;

/// Score counters of a session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreState {
    /// Points earned in the running session
    pub current_score: u64,
    /// Cascade steps completed in the running chain
    pub current_combo: u32,
    /// Best score known to the storage collaborator
    pub high_score: u64,
}

/// Accumulates points and keeps the persistent high score current
#[derive(Debug)]
pub struct ScoreEngine<S> {
    base_points_per_tile: u32,
    combo_multiplier: f64,
    state: ScoreState,
    store: S,
}

impl<S: HighScoreStore> ScoreEngine<S> {
    /// Create an engine with the default scoring constants
    pub const fn with_defaults(store: S) -> Self {
        Self::new(DEFAULT_BASE_POINTS_PER_TILE, DEFAULT_COMBO_MULTIPLIER, store)
    }

    /// Create an engine with explicit scoring constants
    ///
    /// The high score starts at 0 until [`ScoreEngine::load_high_score`] runs.
    pub const fn new(base_points_per_tile: u32, combo_multiplier: f64, store: S) -> Self {
        Self {
            base_points_per_tile,
            combo_multiplier,
            state: ScoreState {
                current_score: 0,
                current_combo: 0,
                high_score: 0,
            },
            store,
        }
    }

    /// Read the high score from the store
    ///
    /// # Errors
    ///
    /// Propagates failures of the storage collaborator
    pub fn load_high_score(&mut self) -> Result<u64> {
        self.state.high_score = self.store.load_high_score()?;
        info!(high_score = self.state.high_score, "High score loaded");
        Ok(self.state.high_score)
    }

    /// Points a clear of `tiles_matched` tiles is worth at the current combo
    pub fn points_for(&self, tiles_matched: usize) -> u64 {
        let exponent = i32::try_from(self.state.current_combo).unwrap_or(i32::MAX);
        let raw = f64::from(self.base_points_per_tile)
            * tiles_matched as f64
            * self.combo_multiplier.powi(exponent);
        // Float to integer casts saturate, and raw is never negative
        raw.round_ties_even() as u64
    }

    /// Award points for a clear and return them
    ///
    /// When the running score passes the high score, the high score follows it and
    /// is saved once.
    ///
    /// # Errors
    ///
    /// Propagates failures of the storage collaborator while saving
    pub fn add_score(&mut self, tiles_matched: usize) -> Result<u64> {
        let points = self.points_for(tiles_matched);
        self.state.current_score = self.state.current_score.saturating_add(points);

        debug!(
            points,
            total = self.state.current_score,
            combo = self.state.current_combo,
            "Score added"
        );

        if self.state.current_score > self.state.high_score {
            self.state.high_score = self.state.current_score;
            self.store.save_high_score(self.state.high_score)?;
        }
        Ok(points)
    }

    /// Advance the combo by one cascade step
    pub const fn increment_combo(&mut self) {
        self.state.current_combo = self.state.current_combo.saturating_add(1);
    }

    /// End the combo chain
    pub const fn reset_combo(&mut self) {
        self.state.current_combo = 0;
    }

    /// Zero the running score and combo for a new session
    pub const fn reset_score(&mut self) {
        self.state.current_score = 0;
        self.state.current_combo = 0;
    }

    /// Points earned in the running session
    pub const fn current_score(&self) -> u64 {
        self.state.current_score
    }

    /// Cascade steps completed in the running chain
    pub const fn current_combo(&self) -> u32 {
        self.state.current_combo
    }

    /// Best score known so far
    pub const fn high_score(&self) -> u64 {
        self.state.high_score
    }

    /// Snapshot of all counters
    pub const fn state(&self) -> ScoreState {
        self.state
    }

    /// Points per matched tile before the multiplier
    pub const fn base_points_per_tile(&self) -> u32 {
        self.base_points_per_tile
    }

    /// Base of the combo multiplier
    pub const fn combo_multiplier(&self) -> f64 {
        self.combo_multiplier
    }

    /// Storage collaborator
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Give the storage collaborator back
    pub fn into_store(self) -> S {
        self.store
    }
}

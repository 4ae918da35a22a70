//! Game constants and runtime configuration defaults

use crate::io::error::{Result, invalid_parameter};

// Board geometry
/// Default number of grid columns
pub const DEFAULT_GRID_WIDTH: usize = 8;
/// Default number of grid rows
pub const DEFAULT_GRID_HEIGHT: usize = 8;
/// Default number of distinct tile types
pub const DEFAULT_TYPE_COUNT: usize = 5;

// Coordinates are signed 32-bit, so both axes must stay well inside i32
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 1024;
/// Maximum allowed number of tile types
pub const MAX_TYPE_COUNT: usize = 64;

// Matching and scoring
/// Minimum run length that counts as a match
pub const DEFAULT_MIN_MATCH_LENGTH: usize = 3;
/// Points awarded per matched tile before the combo multiplier
pub const DEFAULT_BASE_POINTS_PER_TILE: u32 = 10;
/// Base of the exponential combo multiplier
pub const DEFAULT_COMBO_MULTIPLIER: f64 = 1.5;

// Guards against endless cascades on degenerate boards (e.g. a single tile type)
/// Maximum number of cascade steps resolved for one swap
pub const DEFAULT_MAX_CASCADE_STEPS: usize = 64;

// Self-play defaults
/// Fixed seed for reproducible sessions
pub const DEFAULT_SEED: u64 = 42;
/// Default number of swaps attempted per game
pub const DEFAULT_MOVES_PER_GAME: usize = 50;
/// Default number of games played per run
pub const DEFAULT_GAMES: usize = 1;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

/// Session configuration supplied at construction time
///
/// All values are fixed for the lifetime of a session; there is no runtime
/// reconfiguration.
#[derive(Clone, Copy, Debug, PartialEq)]
// Each flag toggles an independent rule variant
#[allow(clippy::struct_excessive_bools)]
pub struct GameConfig {
    /// Number of grid columns
    pub grid_width: usize,
    /// Number of grid rows
    pub grid_height: usize,
    /// Number of distinct tile types, tiles take types in `[0, type_count)`
    pub type_count: usize,
    /// Minimum run length that counts as a match
    pub min_match_length: usize,
    /// Points awarded per matched tile before the combo multiplier
    pub base_points_per_tile: u32,
    /// Base of the exponential combo multiplier
    pub combo_multiplier: f64,
    /// Maximum number of cascade steps resolved for one swap
    pub max_cascade_steps: usize,
    /// Whether a fresh board may contain matches before the first swap
    pub allow_initial_matches: bool,
    /// Whether swaps must involve orthogonally adjacent cells
    pub require_adjacent_swaps: bool,
    /// Whether a swap that produces no match is undone
    pub revert_unmatched_swaps: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            type_count: DEFAULT_TYPE_COUNT,
            min_match_length: DEFAULT_MIN_MATCH_LENGTH,
            base_points_per_tile: DEFAULT_BASE_POINTS_PER_TILE,
            combo_multiplier: DEFAULT_COMBO_MULTIPLIER,
            max_cascade_steps: DEFAULT_MAX_CASCADE_STEPS,
            allow_initial_matches: false,
            require_adjacent_swaps: true,
            revert_unmatched_swaps: true,
        }
    }
}

impl GameConfig {
    /// Check every parameter against its allowed range
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first parameter out of range
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_GRID_DIMENSION).contains(&self.grid_width) {
            return Err(invalid_parameter(
                "grid_width",
                &self.grid_width,
                &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
            ));
        }
        if !(1..=MAX_GRID_DIMENSION).contains(&self.grid_height) {
            return Err(invalid_parameter(
                "grid_height",
                &self.grid_height,
                &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
            ));
        }
        if !(1..=MAX_TYPE_COUNT).contains(&self.type_count) {
            return Err(invalid_parameter(
                "type_count",
                &self.type_count,
                &format!("must be between 1 and {MAX_TYPE_COUNT}"),
            ));
        }
        if self.min_match_length < 2 {
            return Err(invalid_parameter(
                "min_match_length",
                &self.min_match_length,
                &"a single tile cannot form a match",
            ));
        }
        if !self.combo_multiplier.is_finite() || self.combo_multiplier <= 0.0 {
            return Err(invalid_parameter(
                "combo_multiplier",
                &self.combo_multiplier,
                &"must be a finite positive number",
            ));
        }
        if self.max_cascade_steps == 0 {
            return Err(invalid_parameter(
                "max_cascade_steps",
                &self.max_cascade_steps,
                &"at least one cascade step is required to award a match",
            ));
        }
        Ok(())
    }
}

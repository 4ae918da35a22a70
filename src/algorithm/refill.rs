//! Policies for filling cells emptied by a match
//!
//! Clearing a match leaves holes. What happens next is a rule-set decision, so the
//! cascade loop delegates to a [`RefillPolicy`] after every clear.

use rand::{Rng, RngCore};

use crate::spatial::{Grid, Position};

/// Fills holes left by cleared matches
pub trait RefillPolicy {
    /// Rearrange and fill empty cells, returning the number of tiles created
    ///
    /// New tiles take types in `[0, type_count)` drawn from `rng`.
    fn refill(&mut self, grid: &mut Grid, type_count: usize, rng: &mut dyn RngCore) -> usize;
}

/// Leaves holes in place
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRefill;

impl RefillPolicy for NoRefill {
    fn refill(&mut self, _grid: &mut Grid, _type_count: usize, _rng: &mut dyn RngCore) -> usize {
        0
    }
}

/// Drops tiles toward row 0 and spawns new tiles into the vacated top cells
#[derive(Clone, Copy, Debug)]
pub struct GravityRefill {
    spawn: bool,
}

impl Default for GravityRefill {
    fn default() -> Self {
        Self::new()
    }
}

impl GravityRefill {
    /// Collapse columns and spawn replacement tiles
    pub const fn new() -> Self {
        Self { spawn: true }
    }

    /// Collapse columns without spawning, leaving holes at the top
    pub const fn without_spawning() -> Self {
        Self { spawn: false }
    }

    /// Whether replacement tiles are spawned
    pub const fn spawns(&self) -> bool {
        self.spawn
    }

    fn collapse_column(grid: &mut Grid, x: i32) -> i32 {
        let height = grid.height() as i32;
        let mut floor = 0;
        for y in 0..height {
            let from = Position::new(x, y);
            if grid.tile_at(from).is_none() {
                continue;
            }
            if y != floor {
                let _ = grid.move_tile(from, Position::new(x, floor));
            }
            floor += 1;
        }
        floor
    }
}

impl RefillPolicy for GravityRefill {
    fn refill(&mut self, grid: &mut Grid, type_count: usize, rng: &mut dyn RngCore) -> usize {
        let (width, height) = (grid.width() as i32, grid.height() as i32);
        let mut spawned = 0;

        for x in 0..width {
            let floor = Self::collapse_column(grid, x);
            if !self.spawn || type_count == 0 {
                continue;
            }
            for y in floor..height {
                let kind = rng.random_range(0..type_count);
                if grid.spawn(Position::new(x, y), kind).is_some() {
                    spawned += 1;
                }
            }
        }
        spawned
    }
}

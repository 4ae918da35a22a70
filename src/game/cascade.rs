//! Cascade resolution loop
//!
//! One accepted swap may set off a chain: clearing a match and refilling the holes
//! can line up new runs, which are cleared in turn. The first clear scores at
//! combo 0 and every following step raises the combo by one before scoring. The
//! combo resets once a scan comes back empty.

use rand::RngCore;
use tracing::warn;

use crate::algorithm::matching::{MatchDetector, MatchSet};
use crate::algorithm::refill::RefillPolicy;
use crate::game::score::ScoreEngine;
use crate::io::error::Result;
use crate::io::persistence::HighScoreStore;
use crate::spatial::{Grid, GridEvent};

/// Bounds applied while resolving a cascade
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CascadeLimits {
    /// Tile types available to the refill policy
    pub type_count: usize,
    /// Maximum number of steps resolved before giving up on the chain
    pub max_steps: usize,
}

/// One clear within a cascade
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CascadeStep {
    /// Combo value the step was scored at
    pub combo: u32,
    /// Number of tiles removed
    pub tiles_cleared: usize,
    /// Points awarded for the step
    pub points: u64,
    /// Number of tiles the refill policy created afterwards
    pub tiles_spawned: usize,
    /// Grid changes made by the clear and the refill, in order
    pub grid_events: Vec<GridEvent>,
}

/// Outcome of resolving a cascade
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Steps in the order they were resolved
    pub steps: Vec<CascadeStep>,
    /// Sum of all points awarded
    pub total_points: u64,
    /// Whether the step limit stopped the chain while matches remained
    pub truncated: bool,
}

impl CascadeReport {
    /// Total number of tiles removed across all steps
    pub fn tiles_cleared(&self) -> usize {
        self.steps.iter().map(|step| step.tiles_cleared).sum()
    }

    /// Number of steps beyond the first
    pub fn chain_length(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Score, clear and refill until a scan finds no match
///
/// `initial` is the result of the scan that followed the swap. If it is empty the
/// grid is left untouched and only the combo is reset. On success the grid's
/// event journal is drained and split across the steps, so callers drain earlier
/// events first.
///
/// The combo is reset on every return, including errors. A step clears and
/// refills before it is scored, so a failed high-score save leaves the step's
/// tiles removed and its points counted. Later steps are not resolved, and the
/// grid events of every resolved step stay in the journal.
///
/// # Errors
///
/// Returns `Precondition` if the grid was never initialized, and propagates
/// failures of the high-score store
pub fn resolve_cascade<S: HighScoreStore>(
    grid: &mut Grid,
    detector: &MatchDetector,
    score: &mut ScoreEngine<S>,
    refill: &mut dyn RefillPolicy,
    rng: &mut dyn RngCore,
    limits: CascadeLimits,
    initial: MatchSet,
) -> Result<CascadeReport> {
    let outcome = run_steps(grid, detector, score, refill, rng, limits, initial);
    score.reset_combo();
    outcome
}

fn run_steps<S: HighScoreStore>(
    grid: &mut Grid,
    detector: &MatchDetector,
    score: &mut ScoreEngine<S>,
    refill: &mut dyn RefillPolicy,
    rng: &mut dyn RngCore,
    limits: CascadeLimits,
    initial: MatchSet,
) -> Result<CascadeReport> {
    let mut report = CascadeReport::default();
    let mut step_ends = Vec::new();
    let mut matches = initial;

    while !matches.is_empty() {
        if report.steps.len() >= limits.max_steps {
            warn!(
                max_steps = limits.max_steps,
                remaining = matches.len(),
                "Cascade step limit reached"
            );
            report.truncated = true;
            break;
        }

        if !report.steps.is_empty() {
            score.increment_combo();
        }
        let combo = score.current_combo();
        let tiles_cleared = grid.clear(matches.tiles());
        let tiles_spawned = refill.refill(grid, limits.type_count, rng);
        let points = score.add_score(matches.len())?;
        step_ends.push(grid.pending_events());

        report.total_points = report.total_points.saturating_add(points);
        report.steps.push(CascadeStep {
            combo,
            tiles_cleared,
            points,
            tiles_spawned,
            grid_events: Vec::new(),
        });

        matches = detector.find_all_matches(grid)?;
    }

    let mut journal = grid.drain_events().into_iter();
    let mut start = 0;
    for (step, end) in report.steps.iter_mut().zip(step_ends) {
        step.grid_events = journal.by_ref().take(end.saturating_sub(start)).collect();
        start = end;
    }
    Ok(report)
}

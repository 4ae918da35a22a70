//! Search for swaps that produce a match
//!
//! Every orthogonally adjacent pair is tried on a scratch copy of the grid. A swap
//! counts as valid when one of the two swapped tiles ends up in a match, so runs
//! that already existed elsewhere on the board do not make every swap look valid.

use crate::algorithm::matching::{MatchDetector, ensure_initialized};
use crate::io::error::Result;
use crate::spatial::{Grid, Position};

/// A swap between two adjacent cells
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    /// First cell of the swap
    pub from: Position,
    /// Second cell of the swap, adjacent to `from`
    pub to: Position,
}

/// Every adjacent swap that creates a match, in row-major order of `from`
///
/// Each pair is reported once, with `to` to the right of or above `from`.
///
/// # Errors
///
/// Returns `Precondition` if the grid was never initialized
pub fn find_valid_moves(grid: &Grid, detector: &MatchDetector) -> Result<Vec<Move>> {
    ensure_initialized(grid, "find_valid_moves")?;

    let mut moves = Vec::new();
    let mut scratch = grid.detached();
    for candidate in candidate_moves(grid) {
        if creates_match(&mut scratch, detector, candidate)? {
            moves.push(candidate);
        }
    }
    Ok(moves)
}

/// First adjacent swap that creates a match, if any
///
/// # Errors
///
/// Returns `Precondition` if the grid was never initialized
pub fn find_hint(grid: &Grid, detector: &MatchDetector) -> Result<Option<Move>> {
    ensure_initialized(grid, "find_hint")?;

    let mut scratch = grid.detached();
    for candidate in candidate_moves(grid) {
        if creates_match(&mut scratch, detector, candidate)? {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

fn candidate_moves(grid: &Grid) -> Vec<Move> {
    grid.tiles()
        .flat_map(|tile| {
            let from = tile.position();
            [from.offset(1, 0), from.offset(0, 1)]
                .into_iter()
                .filter(move |&to| grid.tile_at(to).is_some())
                .map(move |to| Move { from, to })
        })
        .collect()
}

// Swaps on the scratch grid and always swaps back, leaving it as it was found
fn creates_match(scratch: &mut Grid, detector: &MatchDetector, candidate: Move) -> Result<bool> {
    if !scratch.swap_positions(candidate.from, candidate.to) {
        return Ok(false);
    }
    let matches = detector.find_all_matches(scratch);
    let _ = scratch.swap_positions(candidate.from, candidate.to);
    let matches = matches?;
    Ok(matches.contains(candidate.from) || matches.contains(candidate.to))
}

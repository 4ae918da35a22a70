//! Run and match detection over a grid
//!
//! Runs are scanned from every cell in the increasing x and y directions only. A
//! tile in the middle of a run is still found: the scan that starts at the first
//! tile of the run already contains it, so the union over all start cells covers
//! every qualifying run.

use bitvec::prelude::*;
use std::fmt;

use crate::io::configuration::DEFAULT_MIN_MATCH_LENGTH;
use crate::io::error::{Result, invalid_parameter, precondition};
use crate::spatial::{Grid, Position, Tile, TileId};

/// Axis along which a run extends
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Along a row, toward increasing x
    Horizontal,
    /// Along a column, toward increasing y
    Vertical,
}

impl Orientation {
    /// Both orientations in scan order
    pub const ALL: [Self; 2] = [Self::Horizontal, Self::Vertical];

    /// Unit step `(dx, dy)` along this orientation
    pub const fn step(self) -> (i32, i32) {
        match self {
            Self::Horizontal => (1, 0),
            Self::Vertical => (0, 1),
        }
    }
}

/// Qualifying run of same-typed tiles
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchRun {
    tiles: Vec<Tile>,
    orientation: Orientation,
}

impl MatchRun {
    /// Tiles in increasing coordinate order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Axis of the run
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Number of tiles in the run
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the run holds no tiles
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Shared tile type of the run
    pub fn kind(&self) -> Option<usize> {
        self.tiles.first().map(Tile::kind)
    }

    /// First cell of the run
    pub fn start(&self) -> Option<Position> {
        self.tiles.first().map(Tile::position)
    }
}

/// Deduplicated set of matched tiles
///
/// Membership is tracked with one bit per cell; the tile snapshots are kept in
/// row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchSet {
    mask: BitVec,
    width: usize,
    tiles: Vec<Tile>,
}

impl MatchSet {
    fn from_mask(grid: &Grid, mask: BitVec) -> Self {
        let width = grid.width();
        let tiles = mask
            .iter_ones()
            .filter_map(|index| {
                let position = cell_position(index, width);
                grid.tile_at(position).copied()
            })
            .collect();

        Self { mask, width, tiles }
    }

    /// Number of matched tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no tile matched
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Matched tiles in row-major order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Cells of the matched tiles in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        self.tiles.iter().map(Tile::position)
    }

    /// Test whether the tile at `position` matched
    pub fn contains(&self, position: Position) -> bool {
        cell_index(position, self.width, self.mask.len())
            .is_some_and(|index| self.mask.get(index).as_deref() == Some(&true))
    }

    /// Test whether the tile with handle `id` matched
    pub fn contains_tile(&self, id: TileId) -> bool {
        self.tiles.iter().any(|tile| tile.id() == id)
    }
}

impl fmt::Display for MatchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatchSet({} tiles:", self.len())?;
        for position in self.positions() {
            write!(f, " {position}")?;
        }
        write!(f, ")")
    }
}

/// Finds runs of at least `min_match_length` same-typed tiles
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchDetector {
    min_match_length: usize,
}

impl Default for MatchDetector {
    fn default() -> Self {
        Self {
            min_match_length: DEFAULT_MIN_MATCH_LENGTH,
        }
    }
}

impl MatchDetector {
    /// Create a detector for the given minimum run length
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `min_match_length` is below 2
    pub fn new(min_match_length: usize) -> Result<Self> {
        if min_match_length < 2 {
            return Err(invalid_parameter(
                "min_match_length",
                &min_match_length,
                &"a single tile cannot form a match",
            ));
        }
        Ok(Self { min_match_length })
    }

    /// Minimum run length that counts as a match
    pub const fn min_match_length(&self) -> usize {
        self.min_match_length
    }

    /// Run starting at `start` along `orientation`, if it is long enough to match
    ///
    /// Only cells at and after `start` are considered; a run that merely passes
    /// through `start` does not qualify here.
    pub fn qualifying_run(
        &self,
        grid: &Grid,
        start: Position,
        orientation: Orientation,
    ) -> Option<MatchRun> {
        let tiles = scan_run(grid, start, orientation);
        (tiles.len() >= self.min_match_length).then_some(MatchRun { tiles, orientation })
    }

    /// Every tile belonging to at least one qualifying run
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if the grid was never initialized
    pub fn find_all_matches(&self, grid: &Grid) -> Result<MatchSet> {
        ensure_initialized(grid, "find_all_matches")?;

        let mut mask = bitvec![0; grid.width() * grid.height()];
        for orientation in Orientation::ALL {
            for start in scan_order(grid, orientation) {
                if let Some(run) = self.qualifying_run(grid, start, orientation) {
                    mark_run(&mut mask, grid.width(), &run);
                }
            }
        }

        Ok(MatchSet::from_mask(grid, mask))
    }

    /// Maximal qualifying runs, horizontal runs first
    ///
    /// Unlike the per-cell scan in [`MatchDetector::find_all_matches`], each run is
    /// reported once, from its first tile.
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if the grid was never initialized
    pub fn find_runs(&self, grid: &Grid) -> Result<Vec<MatchRun>> {
        ensure_initialized(grid, "find_runs")?;

        let mut runs = Vec::new();
        for orientation in Orientation::ALL {
            let (dx, dy) = orientation.step();
            for start in scan_order(grid, orientation) {
                let Some(tile) = grid.tile_at(start) else {
                    continue;
                };
                let extends_previous = grid
                    .tile_at(start.offset(-dx, -dy))
                    .is_some_and(|previous| previous.kind() == tile.kind());
                if extends_previous {
                    continue;
                }
                if let Some(run) = self.qualifying_run(grid, start, orientation) {
                    runs.push(run);
                }
            }
        }
        Ok(runs)
    }

    /// Check whether a run starting at `(x, y)` qualifies in either orientation
    ///
    /// This only looks at runs beginning at the cell. A tile in the middle of a run
    /// reports `false` here even though [`MatchDetector::find_all_matches`]
    /// includes it.
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if the grid was never initialized
    pub fn is_tile_in_match(&self, grid: &Grid, x: i32, y: i32) -> Result<bool> {
        ensure_initialized(grid, "is_tile_in_match")?;

        let start = Position::new(x, y);
        Ok(Orientation::ALL
            .iter()
            .any(|&orientation| self.qualifying_run(grid, start, orientation).is_some()))
    }

    /// Check whether the grid holds any qualifying run
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if the grid was never initialized
    pub fn has_matches(&self, grid: &Grid) -> Result<bool> {
        ensure_initialized(grid, "has_matches")?;

        Ok(Orientation::ALL.iter().any(|&orientation| {
            scan_order(grid, orientation)
                .into_iter()
                .any(|start| self.qualifying_run(grid, start, orientation).is_some())
        }))
    }
}

/// Fail with `Precondition` when the grid has never been filled
pub(crate) fn ensure_initialized(grid: &Grid, operation: &'static str) -> Result<()> {
    if grid.is_initialized() {
        Ok(())
    } else {
        Err(precondition(operation, &"grid has not been initialized"))
    }
}

/// Maximal run of the start tile's type, extending toward increasing coordinates
fn scan_run(grid: &Grid, start: Position, orientation: Orientation) -> Vec<Tile> {
    let Some(&first) = grid.tile_at(start) else {
        return Vec::new();
    };

    let (dx, dy) = orientation.step();
    let mut run = vec![first];
    let mut cursor = start.offset(dx, dy);
    while let Some(&tile) = grid.tile_at(cursor) {
        if tile.kind() != first.kind() {
            break;
        }
        run.push(tile);
        cursor = cursor.offset(dx, dy);
    }
    run
}

/// Start cells in the order the reference scan visits them
///
/// Horizontal scans walk each row in turn; vertical scans walk each column.
fn scan_order(grid: &Grid, orientation: Orientation) -> Vec<Position> {
    let (width, height) = (grid.width() as i32, grid.height() as i32);
    match orientation {
        Orientation::Horizontal => (0..height)
            .flat_map(|y| (0..width).map(move |x| Position::new(x, y)))
            .collect(),
        Orientation::Vertical => (0..width)
            .flat_map(|x| (0..height).map(move |y| Position::new(x, y)))
            .collect(),
    }
}

fn mark_run(mask: &mut BitVec, width: usize, run: &MatchRun) {
    let len = mask.len();
    for tile in run.tiles() {
        if let Some(index) = cell_index(tile.position(), width, len) {
            mask.set(index, true);
        }
    }
}

fn cell_index(position: Position, width: usize, len: usize) -> Option<usize> {
    let x = usize::try_from(position.x).ok().filter(|&x| x < width)?;
    let y = usize::try_from(position.y).ok()?;
    let index = y.checked_mul(width)?.checked_add(x)?;
    (index < len).then_some(index)
}

const fn cell_position(index: usize, width: usize) -> Position {
    // width is non-zero whenever the mask holds a set bit
    Position::new((index % width) as i32, (index / width) as i32)
}

//! Grid storage with bounds checking, swapping, clearing and refill primitives
//!
//! The grid owns every tile. Cells are stored row-major in an `Array2` indexed by
//! `[y, x]`, and every occupied cell's tile records that same position. Each
//! mutation appends a [`GridEvent`] to an internal journal that hosts drain to
//! keep their presentation layer in step. The journal grows until it is drained,
//! so a grid used without a `Game` should be drained by its owner or built with
//! [`Grid::detached`].

use ndarray::Array2;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use tracing::info;

use crate::io::error::{Result, invalid_parameter};
use crate::spatial::tiles::{Position, Tile, TileId};

/// Notification describing a single grid mutation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridEvent {
    /// A tile was created in a previously empty cell
    TileCreated {
        /// Snapshot of the new tile
        tile: Tile,
    },
    /// A tile was removed, leaving its cell empty
    TileRemoved {
        /// Snapshot of the tile as it was when removed
        tile: Tile,
    },
    /// A tile changed cells through a swap or gravity
    TileMoved {
        /// Handle of the moved tile
        id: TileId,
        /// Cell the tile occupied before the move
        from: Position,
        /// Cell the tile occupies after the move
        to: Position,
    },
    /// A tile's selection flag changed
    SelectionChanged {
        /// Handle of the affected tile
        id: TileId,
        /// New value of the flag
        selected: bool,
    },
}

/// Ordered record of grid changes, muted on detached copies
#[derive(Debug, Clone, Default)]
struct Journal {
    events: Vec<GridEvent>,
    muted: bool,
}

impl Journal {
    fn push(&mut self, event: GridEvent) {
        if !self.muted {
            self.events.push(event);
        }
    }
}

/// Fixed-size board of optional tiles
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Array2<Option<Tile>>,
    width: usize,
    height: usize,
    initialized: bool,
    next_id: u64,
    journal: Journal,
}

impl Grid {
    /// Create an empty, uninitialized grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Array2::from_elem((height, width), None),
            width,
            height,
            initialized: false,
            next_id: 0,
            journal: Journal::default(),
        }
    }

    /// Build an initialized grid from an explicit type layout
    ///
    /// `rows[y][x]` is the type of the tile at column `x`, row `y`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the layout is empty or its rows differ in length
    pub fn from_rows<R: AsRef<[usize]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        if width == 0 || height == 0 {
            return Err(invalid_parameter(
                "rows",
                &format!("{width}x{height}"),
                &"layout must contain at least one tile",
            ));
        }

        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(invalid_parameter(
                    "rows",
                    &format!("row {y} holds {} tiles", row.len()),
                    &format!("every row must hold {width} tiles"),
                ));
            }
            for (x, &kind) in row.iter().enumerate() {
                let _ = grid.place(x, y, kind);
            }
        }
        grid.initialized = true;
        Ok(grid)
    }

    /// Number of columns
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Whether the grid has been filled by an initializer
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Fill every cell with a tile of uniformly random type in `[0, type_count)`
    ///
    /// Existing tiles are removed first. The fill does not avoid matches, so the
    /// resulting board may already contain runs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `type_count` is zero
    pub fn initialize<R: Rng + ?Sized>(&mut self, type_count: usize, rng: &mut R) -> Result<()> {
        check_type_count(type_count)?;
        self.reset();

        for x in 0..self.width {
            for y in 0..self.height {
                let kind = rng.random_range(0..type_count);
                let _ = self.place(x, y, kind);
            }
        }

        self.initialized = true;
        info!(
            width = self.width,
            height = self.height,
            type_count,
            "Grid initialized"
        );
        Ok(())
    }

    /// Fill every cell while avoiding runs of `min_match_length` or more
    ///
    /// Cells are filled in the same order as [`Grid::initialize`]. For each cell,
    /// any type that would complete a run with the tiles already placed to its left
    /// or below is excluded, and the type is drawn uniformly from the rest. When
    /// every type is excluded (too few types) the draw falls back to all types.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `type_count` is zero
    pub fn initialize_without_matches<R: Rng + ?Sized>(
        &mut self,
        type_count: usize,
        min_match_length: usize,
        rng: &mut R,
    ) -> Result<()> {
        check_type_count(type_count)?;
        self.reset();

        let mut allowed = Vec::with_capacity(type_count);
        for x in 0..self.width {
            for y in 0..self.height {
                allowed.clear();
                allowed.extend(
                    (0..type_count).filter(|&kind| !self.completes_run(x, y, kind, min_match_length)),
                );

                let kind = if allowed.is_empty() {
                    rng.random_range(0..type_count)
                } else {
                    allowed
                        .get(rng.random_range(0..allowed.len()))
                        .copied()
                        .unwrap_or_default()
                };
                let _ = self.place(x, y, kind);
            }
        }

        self.initialized = true;
        info!(
            width = self.width,
            height = self.height,
            type_count,
            min_match_length,
            "Grid initialized without matches"
        );
        Ok(())
    }

    /// Check if a coordinate lies on the board
    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// Tile at the given coordinate, or `None` for empty or out-of-bounds cells
    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y)
            .and_then(|index| self.cells.get(index))
            .and_then(Option::as_ref)
    }

    /// Tile at the given position, or `None` for empty or out-of-bounds cells
    pub fn tile_at(&self, position: Position) -> Option<&Tile> {
        self.get(position.x, position.y)
    }

    /// Look up a tile by handle
    pub fn find(&self, id: TileId) -> Option<&Tile> {
        self.tiles().find(|tile| tile.id() == id)
    }

    /// All tiles in row-major order (row 0 first, then by column)
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten()
    }

    /// Number of occupied cells
    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    /// Empty cells in row-major order
    pub fn holes(&self) -> Vec<Position> {
        self.cells
            .indexed_iter()
            .filter(|(_, cell)| cell.is_none())
            .map(|((row, col), _)| to_position(col, row))
            .collect()
    }

    /// Exchange two tiles identified by handle
    ///
    /// Returns `false` without touching the grid if either tile is absent or both
    /// handles are the same.
    pub fn swap(&mut self, a: TileId, b: TileId) -> bool {
        if a == b {
            return false;
        }
        let (Some(first), Some(second)) = (self.find(a), self.find(b)) else {
            return false;
        };
        let (from, to) = (first.position(), second.position());
        self.swap_positions(from, to)
    }

    /// Exchange the tiles held by two cells
    ///
    /// Both cells and both tiles' recorded positions change within this call.
    /// Returns `false` without touching the grid if either cell is empty or out of
    /// bounds, or both positions are the same.
    pub fn swap_positions(&mut self, a: Position, b: Position) -> bool {
        if a == b {
            return false;
        }
        let (Some(index_a), Some(index_b)) = (self.index(a.x, a.y), self.index(b.x, b.y)) else {
            return false;
        };
        let first = self.cells.get(index_a).copied().flatten();
        let second = self.cells.get(index_b).copied().flatten();
        let (Some(mut first), Some(mut second)) = (first, second) else {
            return false;
        };

        first.set_position(b);
        second.set_position(a);
        if let Some(cell) = self.cells.get_mut(index_a) {
            *cell = Some(second);
        }
        if let Some(cell) = self.cells.get_mut(index_b) {
            *cell = Some(first);
        }

        self.journal.push(GridEvent::TileMoved {
            id: first.id(),
            from: a,
            to: b,
        });
        self.journal.push(GridEvent::TileMoved {
            id: second.id(),
            from: b,
            to: a,
        });
        true
    }

    /// Remove the given tiles, leaving empty cells
    ///
    /// A tile is only removed if its cell still holds the same handle, so stale
    /// snapshots are ignored. Returns the number of tiles removed.
    pub fn clear<'a, I>(&mut self, tiles: I) -> usize
    where
        I: IntoIterator<Item = &'a Tile>,
    {
        let mut removed = 0;
        for tile in tiles {
            let position = tile.position();
            let Some(index) = self.index(position.x, position.y) else {
                continue;
            };
            let Some(cell) = self.cells.get_mut(index) else {
                continue;
            };
            if !cell.is_some_and(|current| current.id() == tile.id()) {
                continue;
            }
            if let Some(current) = cell.take() {
                self.journal.push(GridEvent::TileRemoved { tile: current });
                removed += 1;
            }
        }
        removed
    }

    /// Create a tile of the given type in an empty cell
    ///
    /// Returns `None` if the cell is occupied or out of bounds.
    pub fn spawn(&mut self, position: Position, kind: usize) -> Option<TileId> {
        let [row, col] = self.index(position.x, position.y)?;
        if self.cells.get([row, col]).is_some_and(Option::is_some) {
            return None;
        }
        self.place(col, row, kind)
    }

    /// Move a tile into an empty cell
    ///
    /// Returns `false` if the source is empty, the destination is occupied, or
    /// either is out of bounds.
    pub fn move_tile(&mut self, from: Position, to: Position) -> bool {
        let (Some(source), Some(target)) = (self.index(from.x, from.y), self.index(to.x, to.y))
        else {
            return false;
        };
        if self.cells.get(target).is_none_or(Option::is_some) {
            return false;
        }
        let Some(mut tile) = self.cells.get_mut(source).and_then(Option::take) else {
            return false;
        };

        tile.set_position(to);
        if let Some(cell) = self.cells.get_mut(target) {
            *cell = Some(tile);
        }
        self.journal.push(GridEvent::TileMoved {
            id: tile.id(),
            from,
            to,
        });
        true
    }

    /// Set or clear a tile's selection flag
    ///
    /// Returns `false` if no tile has the given handle.
    pub fn set_selected(&mut self, id: TileId, selected: bool) -> bool {
        let Some(tile) = self.cells.iter_mut().flatten().find(|tile| tile.id() == id) else {
            return false;
        };
        if tile.is_selected() != selected {
            tile.set_selected(selected);
            self.journal.push(GridEvent::SelectionChanged { id, selected });
        }
        true
    }

    /// Currently selected tile, if any
    pub fn selected(&self) -> Option<&Tile> {
        self.tiles().find(|tile| tile.is_selected())
    }

    /// Clear every selection flag
    pub fn clear_selection(&mut self) {
        for tile in self.cells.iter_mut().flatten() {
            if tile.is_selected() {
                tile.set_selected(false);
                self.journal.push(GridEvent::SelectionChanged {
                    id: tile.id(),
                    selected: false,
                });
            }
        }
    }

    /// Tile types laid out as `rows[y][x]`, `None` for empty cells
    pub fn kind_rows(&self) -> Vec<Vec<Option<usize>>> {
        self.cells
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|cell| cell.map(|tile| tile.kind())).collect())
            .collect()
    }

    /// Verify that every tile records its own cell and no handle appears twice
    pub fn check_integrity(&self) -> bool {
        let mut seen = HashSet::new();
        self.cells.indexed_iter().all(|((row, col), cell)| {
            cell.is_none_or(|tile| {
                tile.position() == to_position(col, row) && seen.insert(tile.id())
            })
        })
    }

    /// Number of events recorded since the last drain
    pub const fn pending_events(&self) -> usize {
        self.journal.events.len()
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.journal.events)
    }

    /// Copy of the board that records no events
    ///
    /// Meant for trial swaps that are undone before anyone observes them. Events
    /// pending on `self` are not copied.
    pub fn detached(&self) -> Self {
        Self {
            cells: self.cells.clone(),
            width: self.width,
            height: self.height,
            initialized: self.initialized,
            next_id: self.next_id,
            journal: Journal {
                events: Vec::new(),
                muted: true,
            },
        }
    }

    /// Whether mutations are recorded as events
    pub const fn is_recording(&self) -> bool {
        !self.journal.muted
    }

    fn index(&self, x: i32, y: i32) -> Option<[usize; 2]> {
        let col = usize::try_from(x).ok().filter(|&col| col < self.width)?;
        let row = usize::try_from(y).ok().filter(|&row| row < self.height)?;
        Some([row, col])
    }

    fn kind_at_index(&self, x: usize, y: usize) -> Option<usize> {
        self.cells
            .get([y, x])
            .and_then(Option::as_ref)
            .map(Tile::kind)
    }

    fn completes_run(&self, x: usize, y: usize, kind: usize, min_match_length: usize) -> bool {
        let needed = min_match_length.saturating_sub(1);
        let left = (1..=needed).all(|distance| {
            x.checked_sub(distance)
                .and_then(|col| self.kind_at_index(col, y))
                == Some(kind)
        });
        let below = (1..=needed).all(|distance| {
            y.checked_sub(distance)
                .and_then(|row| self.kind_at_index(x, row))
                == Some(kind)
        });
        left || below
    }

    fn place(&mut self, x: usize, y: usize, kind: usize) -> Option<TileId> {
        let id = TileId::new(self.next_id);
        let tile = Tile::new(id, kind, to_position(x, y));
        let cell = self.cells.get_mut([y, x])?;
        *cell = Some(tile);
        self.next_id += 1;
        self.journal.push(GridEvent::TileCreated { tile });
        Some(id)
    }

    fn reset(&mut self) {
        for cell in &mut self.cells {
            if let Some(tile) = cell.take() {
                self.journal.push(GridEvent::TileRemoved { tile });
            }
        }
        self.initialized = false;
    }
}

impl fmt::Display for Grid {
    /// Renders the top row first, one character per cell, `.` for empty cells
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            let line: String = self
                .cells
                .row(y)
                .iter()
                .map(|cell| {
                    cell.map_or('.', |tile| {
                        u32::try_from(tile.kind())
                            .ok()
                            .and_then(|kind| char::from_digit(kind, 36))
                            .unwrap_or('#')
                    })
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn check_type_count(type_count: usize) -> Result<()> {
    if type_count == 0 {
        return Err(invalid_parameter(
            "type_count",
            &type_count,
            &"at least one tile type is required",
        ));
    }
    Ok(())
}

// Grid dimensions are bounded by configuration validation, far below i32::MAX
const fn to_position(col: usize, row: usize) -> Position {
    Position::new(col as i32, row as i32)
}

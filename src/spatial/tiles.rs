//! Tile records, stable tile handles and grid coordinates

use std::fmt;

/// Stable identity of a tile, issued by the grid that created it
///
/// Handles survive swaps and gravity moves; a cleared tile's handle is never reused
/// by the same grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(u64);

impl TileId {
    /// Wrap a raw handle value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw handle value
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Grid coordinates, `x` is the column and `y` the row
///
/// Coordinates are signed so that neighbor arithmetic at the board edge yields
/// out-of-bounds positions instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    /// Column index
    pub x: i32,
    /// Row index
    pub y: i32,
}

impl Position {
    /// Create a position from column and row
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position shifted by the given deltas
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Check whether two positions share an edge
    pub const fn is_adjacent(self, other: Self) -> bool {
        matches!(
            (self.x.abs_diff(other.x), self.y.abs_diff(other.y)),
            (0, 1) | (1, 0)
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single tile on the board
///
/// Tiles are owned by the grid. Values handed out by the grid are snapshots; the
/// grid updates its own copy when the tile moves or its selection changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    id: TileId,
    kind: usize,
    position: Position,
    selected: bool,
}

impl Tile {
    /// Create an unselected tile
    pub const fn new(id: TileId, kind: usize, position: Position) -> Self {
        Self {
            id,
            kind,
            position,
            selected: false,
        }
    }

    /// Stable handle of this tile
    pub const fn id(&self) -> TileId {
        self.id
    }

    /// Tile type in `[0, type_count)`
    pub const fn kind(&self) -> usize {
        self.kind
    }

    /// Cell currently holding this tile
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Whether the tile is marked as selected
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) const fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) const fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

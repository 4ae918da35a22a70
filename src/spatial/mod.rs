//! Spatial data structures for the puzzle board
//!
//! This module contains:
//! - Tile records, handles and coordinates
//! - The grid container with bounds checking, swapping and clearing

/// Grid storage and mutation
pub mod grid;
/// Tile records and coordinates
pub mod tiles;

pub use grid::{Grid, GridEvent};
pub use tiles::{Position, Tile, TileId};

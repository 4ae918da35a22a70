//! Rules engine for tile-matching puzzles
//!
//! The engine owns the tile grid, detects runs of same-typed tiles, resolves chained
//! matches into cascades and converts them into score with a combo multiplier. Hosts
//! drive it through plain data operations and drain the events it produces.

#![forbid(unsafe_code)]

/// Match detection, refill policies and move search over a grid
pub mod algorithm;
/// Session orchestration: state machine, scoring and cascade resolution
pub mod game;
/// Configuration, errors, persistence and command-line driving
pub mod io;
/// Grid storage and tile data structures
pub mod spatial;

pub use io::error::{GameError, Result};

//! Session orchestration
//!
//! A [`session::Game`] owns one grid, one score engine and the state machine that
//! decides which operations are accepted. Each accepted swap runs the full
//! swap, detect, resolve and rescan cycle before control returns to the host.

/// Cascade resolution loop
pub mod cascade;
/// Combo-aware scoring and high-score tracking
pub mod score;
/// The game session and its events
pub mod session;
/// Finite state machine for game phases
pub mod state;

pub use session::Game;
pub use state::GameState;

//! Input/output concerns surrounding the rules engine

/// Command-line interface for seeded self-play
pub mod cli;
/// Game constants and runtime configuration
pub mod configuration;
/// Error types shared across the crate
pub mod error;
/// High-score persistence collaborators
pub mod persistence;
/// Progress display for multi-game runs
pub mod progress;

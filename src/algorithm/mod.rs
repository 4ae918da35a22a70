/// Run and match detection over a grid
pub mod matching;
/// Valid move search for hints and self-play
pub mod moves;
/// Pluggable policies for filling cleared cells
pub mod refill;

//! Progress display for self-play runs, batching bars when many games are played

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static GAME_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix:>10} [{bar:30.green/white}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Games: [{bar:40.green/white}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Per-game display state: label, moves played, move budget, score
#[derive(Clone, Debug, Default)]
struct GameLine {
    label: String,
    moves: usize,
    budget: usize,
    score: u64,
}

/// Coordinates the bars shown while games are played
///
/// Up to [`MAX_INDIVIDUAL_PROGRESS_BARS`] games get their own bar, showing the
/// most recently started ones. Larger runs add an overall batch bar on top.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    game_bars: Vec<ProgressBar>,
    lines: Vec<GameLine>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a manager with no bars
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            game_bars: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Create the bars for a run of `game_count` games
    pub fn initialize(&mut self, game_count: usize) {
        if game_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(game_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        for _ in 0..game_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let bar = ProgressBar::new(0);
            bar.set_style(GAME_STYLE.clone());
            self.game_bars.push(self.multi_progress.add(bar));
        }
    }

    /// Number of per-game bars in use
    pub fn game_bar_count(&self) -> usize {
        self.game_bars.len()
    }

    /// Whether an overall batch bar is shown
    pub const fn is_batched(&self) -> bool {
        self.batch_bar.is_some()
    }

    /// Register the start of game `index` with a budget of `moves`
    pub fn start_game(&mut self, index: usize, moves: usize) {
        if index >= self.lines.len() {
            self.lines.resize(index + 1, GameLine::default());
        }
        if let Some(line) = self.lines.get_mut(index) {
            *line = GameLine {
                label: format!("game {}", index + 1),
                moves: 0,
                budget: moves,
                score: 0,
            };
        }
        self.update_bars();
    }

    /// Report the moves played and the running score of game `index`
    pub fn update_game(&mut self, index: usize, moves: usize, score: u64) {
        if let Some(line) = self.lines.get_mut(index) {
            line.moves = moves;
            line.score = score;
        }
        self.update_bars();
    }

    /// Mark game `index` as finished
    pub fn complete_game(&mut self, index: usize, score: u64) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(line) = self.lines.get_mut(index) {
            line.label = format!("✓ {}", line.label);
            line.moves = line.budget;
            line.score = score;
        }
        self.update_bars();
    }

    /// Remove all bars from the terminal
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All games played");
        }
        let _ = self.multi_progress.clear();
    }

    fn update_bars(&self) {
        let started: Vec<&GameLine> = self
            .lines
            .iter()
            .filter(|line| !line.label.is_empty())
            .collect();
        let first_visible = started.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = started.get(first_visible..).unwrap_or(&[]);

        for (bar, line) in self.game_bars.iter().zip(visible) {
            bar.set_length(line.budget as u64);
            bar.set_position(line.moves as u64);
            bar.set_prefix(line.label.clone());
            bar.set_message(format!("{}/{} score {}", line.moves, line.budget, line.score));
        }

        for bar in self.game_bars.iter().skip(visible.len()) {
            bar.set_length(0);
            bar.set_position(0);
            bar.set_prefix(String::new());
            bar.set_message(String::new());
        }
    }
}

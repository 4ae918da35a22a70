//! The game session and the events it reports to its host
//!
//! A [`Game`] is constructed once per process or player session with its
//! configuration, its high-score store and a seed. The host calls the trigger
//! operations to move between phases, forwards swap or selection intents during
//! gameplay, and drains [`Event`]s to keep its presentation in step.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::algorithm::matching::MatchDetector;
use crate::algorithm::moves::{Move, find_hint, find_valid_moves};
use crate::algorithm::refill::{GravityRefill, RefillPolicy};
use crate::game::cascade::{CascadeLimits, CascadeReport, resolve_cascade};
use crate::game::score::ScoreEngine;
use crate::game::state::{GameState, Trigger};
use crate::io::configuration::GameConfig;
use crate::io::error::{Result, precondition};
use crate::io::persistence::HighScoreStore;
use crate::spatial::{Grid, GridEvent, Position, TileId};

/// Notification for the host's presentation layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The state machine moved between phases
    StateChanged {
        /// Phase that was exited
        from: GameState,
        /// Phase that was entered
        to: GameState,
    },
    /// The board changed
    Grid(GridEvent),
    /// A cascade step was scored
    ScoreAwarded {
        /// Points awarded for the step
        points: u64,
        /// Tiles removed by the step
        tiles: usize,
        /// Combo the step was scored at
        combo: u32,
        /// Running score after the step
        total: u64,
    },
    /// A swap raised the high score
    HighScore {
        /// New high score
        value: u64,
    },
    /// A swap produced no match and was undone
    SwapReverted {
        /// First cell of the swap
        from: Position,
        /// Second cell of the swap
        to: Position,
    },
}

/// Reason a swap intent was not carried out
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwapRejection {
    /// The session is not in gameplay
    NotPlaying,
    /// Both positions name the same cell
    SameCell,
    /// One of the cells is empty or off the board
    MissingTile,
    /// The cells do not share an edge
    NotAdjacent,
}

/// Result of a swap intent
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The swap was refused and the board is unchanged
    Rejected(SwapRejection),
    /// The swap produced no match and was undone
    Reverted,
    /// The swap stands and its cascade has been resolved
    Resolved(CascadeReport),
}

impl SwapOutcome {
    /// Whether the swap stands
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Result of a selection intent
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Nothing happened: not in gameplay, or the cell is empty
    Ignored,
    /// The tile became the selected tile
    Selected(TileId),
    /// The selected tile was selected again and is no longer selected
    Deselected,
    /// The tile neighbored the selected tile, so the two were swapped
    Swapped(SwapOutcome),
}

/// One game session: state machine, board, scoring and randomness
pub struct Game<S> {
    config: GameConfig,
    state: GameState,
    grid: Option<Grid>,
    detector: MatchDetector,
    score: ScoreEngine<S>,
    refill: Box<dyn RefillPolicy>,
    rng: StdRng,
    events: Vec<Event>,
}

impl<S: HighScoreStore> Game<S> {
    /// Create a session in the `Menu` state and load the high score
    ///
    /// Tiles are refilled with gravity unless another policy is installed with
    /// [`Game::with_refill_policy`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an invalid configuration, and propagates
    /// failures of the store while loading the high score
    pub fn new(config: GameConfig, store: S, seed: u64) -> Result<Self> {
        config.validate()?;
        let detector = MatchDetector::new(config.min_match_length)?;
        let mut score =
            ScoreEngine::new(config.base_points_per_tile, config.combo_multiplier, store);
        score.load_high_score()?;

        Ok(Self {
            config,
            state: GameState::Menu,
            grid: None,
            detector,
            score,
            refill: Box::new(GravityRefill::new()),
            rng: StdRng::seed_from_u64(seed),
            events: Vec::new(),
        })
    }

    /// Replace the policy that fills cleared cells
    #[must_use]
    pub fn with_refill_policy(mut self, policy: impl RefillPolicy + 'static) -> Self {
        self.refill = Box::new(policy);
        self
    }

    /// Active phase
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Session configuration
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Board of the running session, absent in `Menu` and `GameOver`
    pub const fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Match detector configured for this session
    pub const fn detector(&self) -> &MatchDetector {
        &self.detector
    }

    /// Score counters and store
    pub const fn score(&self) -> &ScoreEngine<S> {
        &self.score
    }

    /// Leave the active phase and enter `next`, unconditionally
    ///
    /// Entering `Gameplay` from `Menu` or `GameOver`, or with no board at all,
    /// builds a new board and resets the score; resuming from `Paused` keeps both. Entering `Menu` or `GameOver`
    /// discards the board while keeping the final score.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the board cannot be initialized
    pub fn change_state(&mut self, next: GameState) -> Result<()> {
        let previous = self.state;
        self.exit_state(previous);
        self.state = next;
        self.events.push(Event::StateChanged {
            from: previous,
            to: next,
        });
        self.enter_state(next, previous)
    }

    /// Apply a trigger if the active phase accepts it
    ///
    /// Returns whether a transition happened.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the board cannot be initialized
    pub fn handle(&mut self, trigger: Trigger) -> Result<bool> {
        let Some(next) = self.state.on(trigger) else {
            debug!(state = %self.state, ?trigger, "Trigger ignored");
            return Ok(false);
        };
        self.change_state(next)?;
        Ok(true)
    }

    /// Start a fresh session from the menu
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the board cannot be initialized
    pub fn start_game(&mut self) -> Result<bool> {
        self.handle(Trigger::StartGame)
    }

    /// Pause a running session
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the trigger signature
    pub fn pause(&mut self) -> Result<bool> {
        self.handle(Trigger::Pause)
    }

    /// Resume a paused session
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the trigger signature
    pub fn resume(&mut self) -> Result<bool> {
        self.handle(Trigger::Resume)
    }

    /// Finish a running session
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the trigger signature
    pub fn end_game(&mut self) -> Result<bool> {
        self.handle(Trigger::EndGame)
    }

    /// Go back to the menu from any phase
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the trigger signature
    pub fn return_to_menu(&mut self) -> Result<bool> {
        self.handle(Trigger::ReturnToMenu)
    }

    /// Swap the tiles at `a` and `b` and resolve the resulting cascade
    ///
    /// The whole swap, scan, clear, refill and rescan cycle completes before this
    /// returns. If saving the high score fails, the chain stops after the step
    /// being scored and the combo is back at zero. The board changes made so far
    /// are still reported as events, but no score events are; the points already
    /// counted are readable through [`Game::score`].
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if gameplay has no board, and propagates failures of
    /// the high-score store
    pub fn swap(&mut self, a: Position, b: Position) -> Result<SwapOutcome> {
        let Self {
            config,
            state,
            grid,
            detector,
            score,
            refill,
            rng,
            events,
        } = self;

        if !state.accepts_moves() {
            return Ok(SwapOutcome::Rejected(SwapRejection::NotPlaying));
        }
        let grid = grid
            .as_mut()
            .ok_or_else(|| precondition("swap", &"gameplay has no board"))?;
        if a == b {
            return Ok(SwapOutcome::Rejected(SwapRejection::SameCell));
        }
        if grid.tile_at(a).is_none() || grid.tile_at(b).is_none() {
            return Ok(SwapOutcome::Rejected(SwapRejection::MissingTile));
        }
        if config.require_adjacent_swaps && !a.is_adjacent(b) {
            return Ok(SwapOutcome::Rejected(SwapRejection::NotAdjacent));
        }

        grid.clear_selection();
        let _ = grid.swap_positions(a, b);
        let matches = detector.find_all_matches(grid)?;

        if matches.is_empty() && config.revert_unmatched_swaps {
            let _ = grid.swap_positions(a, b);
            events.extend(grid.drain_events().into_iter().map(Event::Grid));
            events.push(Event::SwapReverted { from: a, to: b });
            debug!(%a, %b, "Swap reverted");
            return Ok(SwapOutcome::Reverted);
        }
        events.extend(grid.drain_events().into_iter().map(Event::Grid));

        let score_before = score.current_score();
        let high_before = score.high_score();
        let limits = CascadeLimits {
            type_count: config.type_count,
            max_steps: config.max_cascade_steps,
        };
        let report = resolve_cascade(grid, detector, score, &mut **refill, rng, limits, matches)
            .inspect_err(|_| events.extend(grid.drain_events().into_iter().map(Event::Grid)))?;

        let mut total = score_before;
        for step in &report.steps {
            total = total.saturating_add(step.points);
            events.push(Event::ScoreAwarded {
                points: step.points,
                tiles: step.tiles_cleared,
                combo: step.combo,
                total,
            });
            events.extend(step.grid_events.iter().copied().map(Event::Grid));
        }
        if score.high_score() > high_before {
            events.push(Event::HighScore {
                value: score.high_score(),
            });
        }

        debug!(
            %a,
            %b,
            steps = report.steps.len(),
            points = report.total_points,
            "Swap resolved"
        );
        Ok(SwapOutcome::Resolved(report))
    }

    /// Click-style selection driving the tiles' selection flags
    ///
    /// Selecting with nothing selected marks the tile; selecting the marked tile
    /// again unmarks it; selecting a neighbor of the marked tile swaps the two;
    /// selecting any other tile moves the mark there.
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if gameplay has no board, and propagates failures of
    /// the high-score store
    pub fn select(&mut self, position: Position) -> Result<Selection> {
        if !self.state.accepts_moves() {
            return Ok(Selection::Ignored);
        }
        let grid = self
            .grid
            .as_mut()
            .ok_or_else(|| precondition("select", &"gameplay has no board"))?;
        let Some(&tile) = grid.tile_at(position) else {
            return Ok(Selection::Ignored);
        };

        let selection = match grid.selected().copied() {
            None => {
                let _ = grid.set_selected(tile.id(), true);
                Selection::Selected(tile.id())
            }
            Some(previous) if previous.id() == tile.id() => {
                let _ = grid.set_selected(previous.id(), false);
                Selection::Deselected
            }
            Some(previous)
                if !self.config.require_adjacent_swaps
                    || previous.position().is_adjacent(position) =>
            {
                let outcome = self.swap(previous.position(), position)?;
                return Ok(Selection::Swapped(outcome));
            }
            Some(previous) => {
                let _ = grid.set_selected(previous.id(), false);
                let _ = grid.set_selected(tile.id(), true);
                Selection::Selected(tile.id())
            }
        };

        self.flush_grid_events();
        Ok(selection)
    }

    /// First swap on the board that would create a match
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if no board is active
    pub fn hint(&self) -> Result<Option<Move>> {
        find_hint(self.active_grid("hint")?, &self.detector)
    }

    /// Every swap on the board that would create a match
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if no board is active
    pub fn valid_moves(&self) -> Result<Vec<Move>> {
        find_valid_moves(self.active_grid("valid_moves")?, &self.detector)
    }

    /// Replace the running board with a prepared one
    ///
    /// # Errors
    ///
    /// Returns `Precondition` outside gameplay or if `grid` was never initialized
    pub fn load_layout(&mut self, grid: Grid) -> Result<()> {
        if !self.state.accepts_moves() {
            return Err(precondition(
                "load_layout",
                &format!("layouts can only be loaded during gameplay, not {}", self.state),
            ));
        }
        if !grid.is_initialized() {
            return Err(precondition("load_layout", &"grid has not been initialized"));
        }
        info!(
            width = grid.width(),
            height = grid.height(),
            "Layout loaded"
        );
        self.grid = Some(grid);
        self.flush_grid_events();
        Ok(())
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.flush_grid_events();
        std::mem::take(&mut self.events)
    }

    /// Host-loop tick: end a stalled game and hand over pending events
    ///
    /// During gameplay, a board on which no swap can create a match moves the
    /// session to `GameOver`. Outside gameplay this only drains events.
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if gameplay has no board
    pub fn update(&mut self) -> Result<Vec<Event>> {
        if self.state.accepts_moves() && self.hint()?.is_none() {
            info!(score = self.score.current_score(), "No moves left");
            let _ = self.end_game()?;
        }
        Ok(self.drain_events())
    }

    /// Return to the menu and release the board
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the transition signature
    pub fn teardown(&mut self) -> Result<()> {
        self.change_state(GameState::Menu)
    }

    /// Consume the session and give the high-score store back
    pub fn into_store(self) -> S {
        self.score.into_store()
    }

    fn exit_state(&self, state: GameState) {
        if state == GameState::Gameplay {
            debug!(score = self.score.current_score(), "Leaving gameplay");
        }
    }

    fn enter_state(&mut self, state: GameState, previous: GameState) -> Result<()> {
        match state {
            GameState::Gameplay if previous.starts_fresh_session() || self.grid.is_none() => {
                self.begin_session()?;
            }
            GameState::Gameplay | GameState::Paused => {}
            GameState::Menu | GameState::GameOver => self.grid = None,
        }
        info!(
            %state,
            %previous,
            score = self.score.current_score(),
            "Entered state"
        );
        Ok(())
    }

    fn begin_session(&mut self) -> Result<()> {
        let mut grid = Grid::new(self.config.grid_width, self.config.grid_height);
        if self.config.allow_initial_matches {
            grid.initialize(self.config.type_count, &mut self.rng)?;
        } else {
            grid.initialize_without_matches(
                self.config.type_count,
                self.config.min_match_length,
                &mut self.rng,
            )?;
        }
        self.score.reset_score();
        self.grid = Some(grid);
        self.flush_grid_events();
        Ok(())
    }

    fn active_grid(&self, operation: &'static str) -> Result<&Grid> {
        self.grid
            .as_ref()
            .ok_or_else(|| precondition(operation, &format!("no board is active in {}", self.state)))
    }

    fn flush_grid_events(&mut self) {
        if let Some(grid) = self.grid.as_mut() {
            self.events
                .extend(grid.drain_events().into_iter().map(Event::Grid));
        }
    }
}

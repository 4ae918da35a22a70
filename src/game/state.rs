//! Finite state machine for game phases

use std::fmt;

/// Phase of a game session; exactly one is active at a time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Waiting for a game to start
    #[default]
    Menu,
    /// Accepting swaps
    Gameplay,
    /// Gameplay suspended; no grid or score mutation is accepted
    Paused,
    /// Session finished; the final score is preserved for display
    GameOver,
}

/// Requests that may move the state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Begin a fresh session from the menu
    StartGame,
    /// Suspend gameplay
    Pause,
    /// Continue a paused session
    Resume,
    /// Finish the running session
    EndGame,
    /// Abandon whatever is active and go back to the menu
    ReturnToMenu,
}

impl GameState {
    /// Every state, in declaration order
    pub const ALL: [Self; 4] = [Self::Menu, Self::Gameplay, Self::Paused, Self::GameOver];

    /// State reached by applying `trigger`, or `None` if the trigger is ignored here
    pub const fn on(self, trigger: Trigger) -> Option<Self> {
        match (self, trigger) {
            (Self::Menu, Trigger::StartGame) | (Self::Paused, Trigger::Resume) => {
                Some(Self::Gameplay)
            }
            (Self::Gameplay, Trigger::Pause) => Some(Self::Paused),
            (Self::Gameplay, Trigger::EndGame) => Some(Self::GameOver),
            (_, Trigger::ReturnToMenu) => Some(Self::Menu),
            _ => None,
        }
    }

    /// Whether gameplay mutations (swaps, selection, scoring) are accepted
    pub const fn accepts_moves(self) -> bool {
        matches!(self, Self::Gameplay)
    }

    /// Whether entering `Gameplay` from this state starts a fresh session
    ///
    /// Resuming from `Paused` keeps the board and score; every other origin
    /// rebuilds the board and resets the score.
    pub const fn starts_fresh_session(self) -> bool {
        !matches!(self, Self::Paused | Self::Gameplay)
    }

    /// Whether the session holds a board in this state
    pub const fn keeps_grid(self) -> bool {
        matches!(self, Self::Gameplay | Self::Paused)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Menu => "Menu",
            Self::Gameplay => "Gameplay",
            Self::Paused => "Paused",
            Self::GameOver => "GameOver",
        };
        f.write_str(name)
    }
}

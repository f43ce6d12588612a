//! Game state machine
//!
//! The single authority on which phase the game is in. Every other flag
//! (`is_playing`, `is_paused`, ...) is derived from it.

use serde::{Deserialize, Serialize};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Nothing shown yet
    #[default]
    Init,
    /// Start menu
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Match ended
    GameOver,
}

impl GamePhase {
    /// Wire name, same as the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Init => "INIT",
            GamePhase::Menu => "MENU",
            GamePhase::Playing => "PLAYING",
            GamePhase::Paused => "PAUSED",
            GamePhase::GameOver => "GAME_OVER",
        }
    }
}

/// Events that drive phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Start,
    Pause,
    Resume,
    Reset,
    Win,
    Lose,
}

/// Transition table. `None` means the event is not accepted in that phase.
pub fn next_phase(phase: GamePhase, event: GameEvent) -> Option<GamePhase> {
    match (phase, event) {
        (GamePhase::Init, GameEvent::Start) => Some(GamePhase::Menu),

        (GamePhase::Menu, GameEvent::Start) => Some(GamePhase::Playing),

        (GamePhase::Playing, GameEvent::Pause) => Some(GamePhase::Paused),
        (GamePhase::Playing, GameEvent::Win) => Some(GamePhase::GameOver),
        (GamePhase::Playing, GameEvent::Lose) => Some(GamePhase::GameOver),

        (GamePhase::Paused, GameEvent::Start) => Some(GamePhase::Playing),
        (GamePhase::Paused, GameEvent::Resume) => Some(GamePhase::Playing),
        (GamePhase::Paused, GameEvent::Reset) => Some(GamePhase::Menu),

        (GamePhase::GameOver, GameEvent::Reset) => Some(GamePhase::Menu),

        _ => None,
    }
}

/// Finite state machine over [`GamePhase`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateMachine {
    phase: GamePhase,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Check if an event would be accepted, without applying it
    pub fn can_transition(&self, event: GameEvent) -> bool {
        next_phase(self.phase, event).is_some()
    }

    /// Apply an event. Returns `false` and leaves the phase untouched when the
    /// event is not valid in the current phase.
    pub fn transition(&mut self, event: GameEvent) -> bool {
        match next_phase(self.phase, event) {
            Some(next) => {
                log::debug!("{:?} --{:?}--> {:?}", self.phase, event, next);
                self.phase = next;
                true
            }
            None => {
                log::debug!("Rejected {:?} in {:?}", event, self.phase);
                false
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// A match exists (playing or paused)
    pub fn in_progress(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::Paused)
    }
}

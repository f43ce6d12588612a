//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock time
//! - Seeded (or injected) RNG only
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod collision;
pub mod difficulty;
pub mod fsm;
pub mod scoring;
pub mod state;
pub mod tick;

pub use ai::{FixedRoll, SpeedRoll};
pub use collision::{PaddleContact, bounce_velocity_y, segment_index};
pub use difficulty::{Difficulty, DifficultySettings, settings_for};
pub use fsm::{GameEvent, GamePhase, StateMachine, next_phase};
pub use scoring::PointScored;
pub use state::{Ball, Direction, GameState, MatchOutcome, Paddle, Score, Side, Surface};
pub use tick::{TickEvents, tick};

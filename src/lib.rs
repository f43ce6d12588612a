//! Pong Arcade - classic two-paddle Pong
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, scoring, AI, state machine)
//! - `game`: Loop driver that owns the simulation and talks to the host
//! - `platform`: Frame scheduling, pacing and resize throttling (+ browser bindings)
//! - `renderer` / `audio`: Capability traits the host implements
//! - `settings`: Data-driven game configuration

pub mod audio;
pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use game::{FrameStatus, GameLoop, Input};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Frames per second the simulation is tuned for (one tick per frame)
    pub const TARGET_FPS: u32 = 60;

    /// Default surface size before the host reports the real one
    pub const DEFAULT_SURFACE_WIDTH: f32 = 800.0;
    pub const DEFAULT_SURFACE_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 10.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    /// Human paddle speed (units per tick)
    pub const PADDLE_SPEED: f32 = 15.0;
    /// AI paddle speed before the first collision redraw
    pub const OPPONENT_START_SPEED: f32 = 10.0;
    /// AI speed redraw range, scaled by the difficulty factor
    pub const OPPONENT_SPEED_MIN: f32 = 10.0;
    pub const OPPONENT_SPEED_MAX: f32 = 20.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 20.0;
    /// Horizontal ball speed (units per tick); never scaled by paddle hits
    pub const BALL_SPEED_X: f32 = 8.0;

    /// Paddle face is split into this many bounce segments
    pub const BOUNCE_SEGMENTS: u32 = 5;
    /// Vertical speed step between adjacent bounce segments
    pub const BOUNCE_STEP: f32 = 5.0;

    /// First side to this score wins
    pub const SCORE_TO_WIN: u32 = 10;

    /// Minimum spacing between resize deliveries (ms)
    pub const RESIZE_THROTTLE_MS: f64 = 1000.0;
}

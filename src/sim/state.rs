//! Game state and core simulation types
//!
//! `GameState` is the whole simulation context: entities, score, phase and
//! RNG. It is owned by the loop driver and passed to every system by `&mut`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::ai::SpeedRoll;
use super::difficulty::{Difficulty, DifficultySettings};
use super::fsm::StateMachine;
use crate::error::{Entity, SimError};
use crate::settings::Settings;

/// Which half of the court
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Human player (paddle one)
    Left,
    /// Computer opponent (paddle two)
    Right,
}

/// Drawing surface bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Diameter
    pub size: f32,
}

impl Ball {
    pub fn new(size: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size,
        }
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Opening serve: horizontally centred, vertically at the difficulty
    /// offset, heading toward the opponent
    pub fn serve(&mut self, surface: &Surface, difficulty: &DifficultySettings, speed_x: f32) {
        self.pos = Vec2::new(surface.width / 2.0, difficulty.offset_y(surface.height));
        self.vel = Vec2::new(speed_x, difficulty.speed);
        self.clamp_vertical(surface);
    }

    /// Re-serve from the centre toward the side that just conceded
    pub fn reset(&mut self, surface: &Surface, difficulty: &DifficultySettings) {
        self.pos = surface.center();
        self.vel = Vec2::new(-self.vel.x, difficulty.speed);
    }

    /// Keep the ball between the top and bottom walls
    pub fn clamp_vertical(&mut self, surface: &Surface) {
        let r = self.radius();
        self.pos.y = self.pos.y.clamp(r, (surface.height - r).max(r));
    }
}

/// Vertical movement request for the human paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Up,
    Down,
    #[default]
    None,
}

/// A paddle. Only the vertical position moves; x is fixed by its side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub side: Side,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Units per tick
    pub speed: f32,
    /// Input direction (human paddle only)
    pub direction: Direction,
}

impl Paddle {
    pub fn new(side: Side, width: f32, height: f32, speed: f32) -> Self {
        Self {
            side,
            y: 0.0,
            width,
            height,
            speed,
            direction: Direction::None,
        }
    }

    /// Left edge of the paddle. Each paddle sits one paddle-width in from its wall.
    pub fn x(&self, surface: &Surface) -> f32 {
        match self.side {
            Side::Left => self.width,
            Side::Right => surface.width - 2.0 * self.width,
        }
    }

    /// Horizontal line the ball centre must cross to touch this paddle
    pub fn collision_plane(&self, surface: &Surface, ball_size: f32) -> f32 {
        match self.side {
            Side::Left => self.x(surface) + self.width + ball_size / 2.0,
            Side::Right => self.x(surface) - ball_size / 2.0,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Vertical extent check, edges inclusive
    pub fn spans(&self, y: f32) -> bool {
        y >= self.y && y <= self.bottom()
    }

    pub fn center_on(&mut self, surface: &Surface) {
        self.y = surface.height / 2.0 - self.height / 2.0;
        self.clamp(surface);
    }

    pub fn clamp(&mut self, surface: &Surface) {
        self.y = self.y.clamp(0.0, (surface.height - self.height).max(0.0));
    }

    /// Move by the current input direction, staying inside the surface
    pub fn apply_direction(&mut self, surface: &Surface) {
        match self.direction {
            Direction::Up => self.y -= self.speed,
            Direction::Down => self.y += self.speed,
            Direction::None => return,
        }
        self.clamp(surface);
    }
}

/// Points per side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    /// Add exactly one point and return the new total for that side
    pub fn award(&mut self, side: Side) -> u32 {
        let slot = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        *slot = slot.saturating_add(1);
        *slot
    }
}

/// How a finished match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    pub winner: Side,
    pub score: Score,
}

impl MatchOutcome {
    /// The human (left) side won
    pub fn player_won(&self) -> bool {
        self.winner == Side::Left
    }
}

/// Complete simulation context
#[derive(Debug)]
pub struct GameState {
    /// Authoritative phase
    pub machine: StateMachine,
    /// Rules and geometry this game was created with
    pub settings: Settings,
    /// Difficulty of the current match
    pub difficulty: Difficulty,
    pub surface: Surface,
    pub ball: Ball,
    /// Human paddle (left)
    pub paddle_one: Paddle,
    /// AI paddle (right)
    pub paddle_two: Paddle,
    pub score: Score,
    /// Set by the scoring event that ends a match, cleared on the next match
    pub outcome: Option<MatchOutcome>,
    /// Simulation tick counter for the current match
    pub time_ticks: u64,
    /// Source of the opponent speed redraw
    pub(crate) roll: Box<dyn SpeedRoll>,
}

impl GameState {
    /// Create a game in the INIT phase with a seeded opponent RNG
    pub fn new(settings: Settings, surface: Surface, seed: u64) -> Self {
        Self::with_speed_roll(settings, surface, Box::new(Pcg32::seed_from_u64(seed)))
    }

    /// Create a game with a custom opponent speed source
    pub fn with_speed_roll(settings: Settings, surface: Surface, roll: Box<dyn SpeedRoll>) -> Self {
        let mut state = Self {
            machine: StateMachine::new(),
            difficulty: settings.difficulty,
            surface,
            ball: Ball::new(settings.ball_size),
            paddle_one: Paddle::new(
                Side::Left,
                settings.paddle_width,
                settings.paddle_height,
                settings.paddle_speed,
            ),
            paddle_two: Paddle::new(
                Side::Right,
                settings.paddle_width,
                settings.paddle_height,
                settings.opponent_speed,
            ),
            score: Score::default(),
            outcome: None,
            time_ticks: 0,
            settings,
            roll,
        };
        state.new_match(state.difficulty);
        state
    }

    pub fn difficulty_settings(&self) -> DifficultySettings {
        self.difficulty.settings()
    }

    /// Reset everything a match owns: score, outcome, paddles and serve
    pub fn new_match(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.score = Score::default();
        self.outcome = None;
        self.time_ticks = 0;

        self.paddle_one.center_on(&self.surface);
        self.paddle_one.direction = Direction::None;
        self.paddle_two.center_on(&self.surface);
        self.paddle_two.speed = self.settings.opponent_speed;

        let ds = self.difficulty_settings();
        self.ball.serve(&self.surface, &ds, self.settings.ball_speed_x);
    }

    /// Adopt a new surface size: ball back to centre, paddles kept inside
    pub fn resize(&mut self, surface: Surface) {
        self.surface = surface;
        let ds = self.difficulty_settings();
        self.ball.reset(&self.surface, &ds);
        self.paddle_one.clamp(&self.surface);
        self.paddle_two.clamp(&self.surface);
    }

    /// Any NaN/infinity means physics invariants are gone
    pub fn check_finite(&self) -> Result<(), SimError> {
        if !self.ball.pos.is_finite() {
            return Err(SimError::NonFinite {
                entity: Entity::Ball,
                field: "position",
            });
        }
        if !self.ball.vel.is_finite() {
            return Err(SimError::NonFinite {
                entity: Entity::Ball,
                field: "velocity",
            });
        }
        for (entity, paddle) in [
            (Entity::PaddleOne, &self.paddle_one),
            (Entity::PaddleTwo, &self.paddle_two),
        ] {
            if !paddle.y.is_finite() {
                return Err(SimError::NonFinite { entity, field: "y" });
            }
            if !paddle.speed.is_finite() {
                return Err(SimError::NonFinite {
                    entity,
                    field: "speed",
                });
            }
        }
        Ok(())
    }
}

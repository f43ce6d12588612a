//! Render boundary
//!
//! The core never draws. After each tick it hands a read-only [`Snapshot`] to
//! whatever [`RenderSink`] the host installed (canvas, terminal, nothing).

use serde::Serialize;

use crate::sim::{GamePhase, GameState, Side};

/// Position and size of one paddle, in surface units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaddleView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub width: f32,
    pub height: f32,
    pub ball_x: f32,
    pub ball_y: f32,
    pub ball_size: f32,
    pub paddle_one: PaddleView,
    pub paddle_two: PaddleView,
    pub score_one: u32,
    pub score_two: u32,
    pub phase: GamePhase,
    /// Only `Some` while the game is over
    pub player_won: Option<bool>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let view = |side: Side| {
            let paddle = match side {
                Side::Left => &state.paddle_one,
                Side::Right => &state.paddle_two,
            };
            PaddleView {
                x: paddle.x(&state.surface),
                y: paddle.y,
                width: paddle.width,
                height: paddle.height,
            }
        };

        let phase = state.machine.phase();
        Self {
            width: state.surface.width,
            height: state.surface.height,
            ball_x: state.ball.pos.x,
            ball_y: state.ball.pos.y,
            ball_size: state.ball.size,
            paddle_one: view(Side::Left),
            paddle_two: view(Side::Right),
            score_one: state.score.left,
            score_two: state.score.right,
            phase,
            player_won: if phase == GamePhase::GameOver {
                state.outcome.map(|o| o.player_won())
            } else {
                None
            },
        }
    }

    /// JSON for hosts on the other side of an FFI boundary
    pub fn to_json(&self) -> String {
        // Plain numbers, enums and options only; serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Anything that can draw a frame
pub trait RenderSink {
    fn draw(&mut self, snapshot: &Snapshot);
}

/// Renderer slot that tolerates a missing sink
#[derive(Default)]
pub struct Renderer {
    sink: Option<Box<dyn RenderSink>>,
    warned_missing: bool,
}

impl Renderer {
    pub fn set_sink(&mut self, sink: Box<dyn RenderSink>) {
        self.sink = Some(sink);
    }

    pub fn draw(&mut self, state: &GameState) {
        let Some(sink) = self.sink.as_mut() else {
            if !self.warned_missing {
                log::warn!("No render sink installed - frames will not be drawn");
                self.warned_missing = true;
            }
            return;
        };
        sink.draw(&Snapshot::capture(state));
    }
}

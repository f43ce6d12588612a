//! Ball physics and collision response
//!
//! Per tick: integrate, reflect off the top/bottom walls, then test the paddle
//! on whichever side the ball has crossed into. Paddle hits flip the
//! horizontal velocity without scaling it; the vertical velocity comes from
//! which fifth of the paddle face the ball struck.

use super::state::{Ball, Paddle, Side, Surface};
use crate::consts::{BOUNCE_SEGMENTS, BOUNCE_STEP};

/// Result of a paddle test on the side the ball crossed into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddleContact {
    pub side: Side,
    /// `false` means the ball is past the paddle plane but missed the paddle
    pub hit: bool,
}

/// Advance the ball by one tick of velocity
#[inline]
pub fn integrate(ball: &mut Ball) {
    ball.pos += ball.vel;
}

/// Bounce off the top/bottom walls. Returns true on a bounce.
///
/// The position is clamped back onto the wall so the ball cannot sit outside
/// and flip its velocity every tick.
pub fn reflect_walls(ball: &mut Ball, surface: &Surface) -> bool {
    let r = ball.radius();
    if ball.pos.y > surface.height - r || ball.pos.y < r {
        ball.vel.y = -ball.vel.y;
        ball.clamp_vertical(surface);
        true
    } else {
        false
    }
}

/// Index of the paddle segment (0 = top) containing `y`
pub fn segment_index(paddle: &Paddle, y: f32) -> u32 {
    let segment_height = paddle.height / BOUNCE_SEGMENTS as f32;
    let raw = ((y - paddle.y) / segment_height).floor();
    // The bottom edge is inside the paddle but would index one past the end
    raw.clamp(0.0, (BOUNCE_SEGMENTS - 1) as f32) as u32
}

/// Vertical velocity after striking the given segment: centre is flat,
/// outer segments deflect hardest
pub fn bounce_velocity_y(segment: u32, factor: f32) -> f32 {
    let center = (BOUNCE_SEGMENTS / 2) as i32;
    (segment as i32 - center) as f32 * BOUNCE_STEP * factor
}

/// Apply a paddle hit to the ball
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle, factor: f32) {
    ball.vel.x = -ball.vel.x;
    ball.vel.y = bounce_velocity_y(segment_index(paddle, ball.pos.y), factor);
}

/// Test the ball against the paddle whose plane it has crossed.
///
/// Returns `None` while the ball is between the two planes. Only one side
/// can be tested per tick because the planes do not overlap.
pub fn resolve_paddles(
    ball: &mut Ball,
    paddle_one: &Paddle,
    paddle_two: &Paddle,
    surface: &Surface,
    factor: f32,
) -> Option<PaddleContact> {
    let paddle = if ball.pos.x < paddle_one.collision_plane(surface, ball.size) {
        paddle_one
    } else if ball.pos.x > paddle_two.collision_plane(surface, ball.size) {
        paddle_two
    } else {
        return None;
    };

    let approaching = match paddle.side {
        Side::Left => ball.vel.x < 0.0,
        Side::Right => ball.vel.x > 0.0,
    };
    let hit = approaching && paddle.spans(ball.pos.y);
    if hit {
        bounce_off_paddle(ball, paddle, factor);
    }

    Some(PaddleContact {
        side: paddle.side,
        hit,
    })
}

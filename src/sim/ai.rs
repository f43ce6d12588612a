//! Opponent AI
//!
//! A plain tracker: no prediction and no smoothing. The paddle may overshoot
//! and oscillate around the ball by one speed step, which keeps it beatable.

use std::fmt;

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Ball, Paddle, Surface};
use crate::consts::{OPPONENT_SPEED_MAX, OPPONENT_SPEED_MIN};

/// Source of the opponent's speed redraw. Swappable so tests can pin it.
pub trait SpeedRoll: fmt::Debug {
    /// Uniform sample from `[min, max)`
    fn roll(&mut self, min: f32, max: f32) -> f32;
}

impl SpeedRoll for Pcg32 {
    fn roll(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.random_range(min..max)
        } else {
            min
        }
    }
}

/// Always returns the same fraction of the requested range
#[derive(Debug, Clone, Copy)]
pub struct FixedRoll(pub f32);

impl SpeedRoll for FixedRoll {
    fn roll(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.0.clamp(0.0, 1.0)
    }
}

/// Move the paddle one speed step toward the ball
pub fn track_ball(paddle: &mut Paddle, ball: &Ball, surface: &Surface) {
    if ball.pos.y < paddle.y {
        paddle.y -= paddle.speed;
    } else if ball.pos.y > paddle.bottom() {
        paddle.y += paddle.speed;
    }
    paddle.clamp(surface);
}

/// Draw a new opponent speed from `[10, 20) * factor`
pub fn redraw_speed(paddle: &mut Paddle, roll: &mut dyn SpeedRoll, factor: f32) {
    paddle.speed = roll.roll(OPPONENT_SPEED_MIN, OPPONENT_SPEED_MAX) * factor;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Side;
    use glam::Vec2;
    use rand::SeedableRng;

    fn setup(paddle_y: f32, ball_y: f32) -> (Paddle, Ball, Surface) {
        let mut paddle = Paddle::new(Side::Right, 10.0, 100.0, 10.0);
        paddle.y = paddle_y;
        let mut ball = Ball::new(20.0);
        ball.pos = Vec2::new(400.0, ball_y);
        (paddle, ball, Surface::new(800.0, 600.0))
    }

    #[test]
    fn test_moves_up_toward_ball() {
        let (mut paddle, ball, surface) = setup(250.0, 100.0);
        track_ball(&mut paddle, &ball, &surface);
        assert_eq!(paddle.y, 240.0);
    }

    #[test]
    fn test_moves_down_toward_ball() {
        let (mut paddle, ball, surface) = setup(250.0, 500.0);
        track_ball(&mut paddle, &ball, &surface);
        assert_eq!(paddle.y, 260.0);
    }

    #[test]
    fn test_holds_when_ball_is_level() {
        let (mut paddle, ball, surface) = setup(250.0, 300.0);
        track_ball(&mut paddle, &ball, &surface);
        assert_eq!(paddle.y, 250.0);

        // Edges count as level
        let (mut paddle, ball, surface) = setup(250.0, 350.0);
        track_ball(&mut paddle, &ball, &surface);
        assert_eq!(paddle.y, 250.0);
    }

    #[test]
    fn test_clamped_at_top() {
        let (mut paddle, ball, surface) = setup(4.0, 0.0);
        track_ball(&mut paddle, &ball, &surface);
        assert_eq!(paddle.y, 0.0);
    }

    #[test]
    fn test_redraw_range_scales_with_factor() {
        let mut rng = Pcg32::seed_from_u64(42);
        let (mut paddle, _, _) = setup(0.0, 0.0);
        for _ in 0..200 {
            redraw_speed(&mut paddle, &mut rng, 2.0);
            assert!(paddle.speed >= 20.0 && paddle.speed < 40.0, "{}", paddle.speed);
        }
    }

    #[test]
    fn test_fixed_roll() {
        let (mut paddle, _, _) = setup(0.0, 0.0);
        redraw_speed(&mut paddle, &mut FixedRoll(0.5), 1.0);
        assert_eq!(paddle.speed, 15.0);
    }

    #[test]
    fn test_seeded_roll_is_deterministic() {
        let mut a = Pcg32::seed_from_u64(9);
        let mut b = Pcg32::seed_from_u64(9);
        for _ in 0..10 {
            assert_eq!(a.roll(10.0, 20.0), b.roll(10.0, 20.0));
        }
    }
}

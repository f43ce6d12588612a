//! Game settings
//!
//! Supplied by the host (optionally as JSON) when the game is created.
//! Nothing here is persisted between sessions.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::sim::Difficulty;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Match ===
    /// First side to reach this score wins
    pub score_to_win: u32,
    /// Difficulty used for the next match
    pub difficulty: Difficulty,

    // === Pacing ===
    /// Target simulation rate (one tick per frame)
    pub fps: u32,

    // === Geometry (surface units) ===
    pub ball_size: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,

    // === Speeds (units per tick) ===
    /// Horizontal ball speed at serve
    pub ball_speed_x: f32,
    /// Human paddle speed
    pub paddle_speed: f32,
    /// AI paddle speed until the first collision redraw
    pub opponent_speed: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Loop background music while playing
    pub music: bool,

    // === Host ===
    /// Minimum spacing between resize deliveries (ms)
    pub resize_throttle_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            score_to_win: SCORE_TO_WIN,
            difficulty: Difficulty::Normal,

            fps: TARGET_FPS,

            ball_size: BALL_SIZE,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,

            ball_speed_x: BALL_SPEED_X,
            paddle_speed: PADDLE_SPEED,
            opponent_speed: OPPONENT_START_SPEED,

            master_volume: 0.8,
            music: true,

            resize_throttle_ms: RESIZE_THROTTLE_MS,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check every field is in a range the simulation can work with
    pub fn validate(&self) -> Result<(), SimError> {
        if self.score_to_win == 0 {
            return Err(SimError::InvalidSetting {
                name: "score_to_win",
                value: 0.0,
                expected: ">= 1",
            });
        }
        if self.fps == 0 {
            return Err(SimError::InvalidSetting {
                name: "fps",
                value: 0.0,
                expected: ">= 1",
            });
        }

        let positive = [
            ("ball_size", self.ball_size),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("ball_speed_x", self.ball_speed_x),
            ("paddle_speed", self.paddle_speed),
            ("opponent_speed", self.opponent_speed),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::InvalidSetting {
                    name,
                    value: value as f64,
                    expected: "finite and > 0",
                });
            }
        }

        if !(0.0..=1.0).contains(&self.master_volume) {
            return Err(SimError::InvalidSetting {
                name: "master_volume",
                value: self.master_volume as f64,
                expected: "0.0 - 1.0",
            });
        }
        if !self.resize_throttle_ms.is_finite() || self.resize_throttle_ms < 0.0 {
            return Err(SimError::InvalidSetting {
                name: "resize_throttle_ms",
                value: self.resize_throttle_ms,
                expected: "finite and >= 0",
            });
        }
        Ok(())
    }

    /// Milliseconds between simulation ticks
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.fps.max(1) as f64
    }

    /// Smallest surface the paddles and ball still fit into
    pub fn min_surface(&self) -> (f32, f32) {
        (
            4.0 * self.paddle_width + 2.0 * self.ball_size,
            self.paddle_height + self.ball_size,
        )
    }

    /// Reject surfaces that are non-finite or smaller than [`Self::min_surface`]
    pub fn check_surface(&self, width: f32, height: f32) -> Result<(), SimError> {
        let (min_w, min_h) = self.min_surface();
        if !width.is_finite() || width < min_w {
            return Err(SimError::InvalidSetting {
                name: "surface_width",
                value: width as f64,
                expected: "finite and >= 4 paddle widths + 2 balls",
            });
        }
        if !height.is_finite() || height < min_h {
            return Err(SimError::InvalidSetting {
                name: "surface_height",
                value: height as f64,
                expected: "finite and >= paddle height + ball size",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.score_to_win, 10);
        assert_eq!(settings.difficulty, Difficulty::Normal);
    }

    #[test]
    fn test_from_json_partial() {
        let settings = Settings::from_json(r#"{ "score_to_win": 3, "difficulty": "hard" }"#)
            .expect("valid settings");
        assert_eq!(settings.score_to_win, 3);
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.paddle_height, PADDLE_HEIGHT);
    }

    #[test]
    fn test_from_json_rejects_zero_target() {
        let err = Settings::from_json(r#"{ "score_to_win": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidSetting {
                name: "score_to_win",
                ..
            }
        ));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Settings::from_json("{ nope"),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_paddle() {
        let settings = Settings {
            paddle_height: -1.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_check_surface() {
        let settings = Settings::default();
        assert!(settings.check_surface(800.0, 600.0).is_ok());
        // Exactly the minimum still fits
        assert!(settings.check_surface(80.0, 120.0).is_ok());
        assert!(matches!(
            settings.check_surface(60.0, 600.0),
            Err(SimError::InvalidSetting {
                name: "surface_width",
                ..
            })
        ));
        assert!(matches!(
            settings.check_surface(800.0, 50.0),
            Err(SimError::InvalidSetting {
                name: "surface_height",
                ..
            })
        ));
        assert!(settings.check_surface(f32::NAN, 600.0).is_err());
        assert!(settings.check_surface(800.0, f32::INFINITY).is_err());
    }

    #[test]
    fn test_frame_interval() {
        let settings = Settings::default();
        assert!((settings.frame_interval_ms() - 1000.0 / 60.0).abs() < 1e-9);
    }
}

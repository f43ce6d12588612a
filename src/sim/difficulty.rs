//! Difficulty table
//!
//! Maps a difficulty level to the ball's serve parameters and the factor that
//! scales paddle bounces and the opponent's reaction speed.

use serde::{Deserialize, Serialize};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
    Extreme,
}

/// Per-difficulty physics parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultySettings {
    /// Vertical ball speed at serve
    pub speed: f32,
    /// Distance above the surface centre the first serve starts at
    pub offset_from_center: f32,
    /// Multiplier for bounce deflection and AI speed
    pub factor: f32,
}

impl DifficultySettings {
    /// Initial vertical ball position for a surface of the given height
    pub fn offset_y(&self, height: f32) -> f32 {
        height / 2.0 - self.offset_from_center
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Normal, Difficulty::Hard, Difficulty::Extreme];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        }
    }

    /// Parse a difficulty identifier; `None` for anything unrecognized
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "extreme" => Some(Difficulty::Extreme),
            _ => None,
        }
    }

    /// Physics parameters for this difficulty
    pub fn settings(&self) -> DifficultySettings {
        settings_for(*self)
    }
}

/// Immutable difficulty lookup
pub fn settings_for(difficulty: Difficulty) -> DifficultySettings {
    match difficulty {
        Difficulty::Normal => DifficultySettings {
            speed: 2.0,
            offset_from_center: 10.0,
            factor: 1.0,
        },
        Difficulty::Hard => DifficultySettings {
            speed: 3.0,
            offset_from_center: 20.0,
            factor: 1.5,
        },
        Difficulty::Extreme => DifficultySettings {
            speed: 4.0,
            offset_from_center: 30.0,
            factor: 2.0,
        },
    }
}

//! Audio boundary
//!
//! The core decides *when* a sound plays; the host decides *how*. A missing
//! sink is logged once and otherwise ignored.

use serde::Serialize;

use crate::sim::{Side, TickEvents};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundEffect {
    /// Ball hits a paddle
    PaddleHit,
    /// Ball hits top/bottom wall
    WallHit,
    /// Opponent scored a point
    PointLost,
    /// Player scored a point
    PointWon,
    /// Player won the match
    GameWon,
    /// Opponent won the match
    GameOver,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::PaddleHit => "paddle_hit",
            SoundEffect::WallHit => "wall_hit",
            SoundEffect::PointLost => "point_lost",
            SoundEffect::PointWon => "point_won",
            SoundEffect::GameWon => "game_won",
            SoundEffect::GameOver => "game_over",
        }
    }

    /// Sounds for one tick, in the order they happened
    pub fn for_tick(events: &TickEvents) -> Vec<SoundEffect> {
        let mut sounds = Vec::new();
        if events.wall_hit {
            sounds.push(SoundEffect::WallHit);
        }
        if events.paddle_hit.is_some() {
            sounds.push(SoundEffect::PaddleHit);
        }
        if let Some(outcome) = events.outcome {
            sounds.push(if outcome.player_won() {
                SoundEffect::GameWon
            } else {
                SoundEffect::GameOver
            });
        } else if let Some(side) = events.point {
            sounds.push(match side {
                Side::Left => SoundEffect::PointWon,
                Side::Right => SoundEffect::PointLost,
            });
        }
        sounds
    }
}

/// Host audio backend
pub trait AudioSink {
    /// Play a one-shot effect at the given volume (0.0 - 1.0)
    fn play(&mut self, effect: SoundEffect, volume: f32);
    /// Start or stop the looping background track
    fn set_music(&mut self, playing: bool, volume: f32);
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Option<Box<dyn AudioSink>>,
    master_volume: f32,
    music_enabled: bool,
    muted: bool,
    warned_missing: bool,
}

impl AudioManager {
    pub fn new(sink: Option<Box<dyn AudioSink>>, master_volume: f32, music_enabled: bool) -> Self {
        Self {
            sink,
            master_volume: master_volume.clamp(0.0, 1.0),
            music_enabled,
            muted: false,
            warned_missing: false,
        }
    }

    pub fn set_sink(&mut self, sink: Box<dyn AudioSink>) {
        self.sink = Some(sink);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    fn sink(&mut self) -> Option<&mut Box<dyn AudioSink>> {
        if self.sink.is_none() && !self.warned_missing {
            log::warn!("No audio sink installed - sounds disabled");
            self.warned_missing = true;
        }
        self.sink.as_mut()
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if let Some(sink) = self.sink() {
            sink.play(effect, vol);
        }
    }

    /// Start/stop background music (no-op when music is disabled in settings)
    pub fn music(&mut self, playing: bool) {
        if !self.music_enabled {
            return;
        }
        let vol = self.effective_volume();
        if let Some(sink) = self.sink() {
            sink.set_music(playing, vol);
        }
    }
}

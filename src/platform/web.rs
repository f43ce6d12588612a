//! Browser bindings
//!
//! JS owns the canvas, the audio elements and `requestAnimationFrame`. It
//! forwards input here and receives snapshots/sounds through callbacks.
//! After an input it calls `take_frame_request`, and from its animation
//! callback `frame`; either returning true means "request one more frame".

use js_sys::Function;
use wasm_bindgen::prelude::*;

use super::{FrameRequest, ResizeThrottle};
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::{DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH};
use crate::game::{FrameStatus, GameLoop, Input};
use crate::renderer::{RenderSink, Snapshot};
use crate::settings::Settings;
use crate::sim::Surface;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Pong starting...");
}

/// Calls a JS function with the snapshot as a JSON string
struct JsRenderSink(Function);

impl RenderSink for JsRenderSink {
    fn draw(&mut self, snapshot: &Snapshot) {
        if let Err(err) = self.0.call1(&JsValue::NULL, &JsValue::from_str(&snapshot.to_json())) {
            log::warn!("Draw callback failed: {err:?}");
        }
    }
}

/// Calls `(name, volume)` for effects and `("music", volume)` / `("music_stop", 0)` for music
struct JsAudioSink(Function);

impl JsAudioSink {
    fn emit(&self, name: &str, volume: f32) {
        let result = self.0.call2(
            &JsValue::NULL,
            &JsValue::from_str(name),
            &JsValue::from_f64(volume as f64),
        );
        if let Err(err) = result {
            log::warn!("Sound callback failed: {err:?}");
        }
    }
}

impl AudioSink for JsAudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.emit(effect.as_str(), volume);
    }

    fn set_music(&mut self, playing: bool, volume: f32) {
        if playing {
            self.emit("music", volume);
        } else {
            self.emit("music_stop", 0.0);
        }
    }
}

/// Game handle exported to JS
#[wasm_bindgen]
pub struct WebGame {
    game: GameLoop,
    frames: FrameRequest,
    resize: ResizeThrottle,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game. `settings_json` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str, width: f32, height: f32) -> Result<WebGame, JsValue> {
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json(settings_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let surface = match settings.check_surface(width, height) {
            Ok(()) => Surface::new(width, height),
            Err(err) => {
                log::warn!("Starting with the default surface: {err}");
                Surface::new(DEFAULT_SURFACE_WIDTH, DEFAULT_SURFACE_HEIGHT)
            }
        };
        let resize = ResizeThrottle::new(settings.resize_throttle_ms);
        let seed = js_sys::Date::now() as u64;
        let mut game =
            GameLoop::new(settings, surface, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.boot();

        Ok(WebGame {
            game,
            frames: FrameRequest::new(),
            resize,
        })
    }

    /// `callback(snapshotJson)` after every state change worth drawing
    pub fn set_draw_callback(&mut self, callback: Function) {
        self.game.set_render_sink(Box::new(JsRenderSink(callback)));
    }

    /// `callback(name, volume)` for sound effects and music
    pub fn set_sound_callback(&mut self, callback: Function) {
        self.game.set_audio_sink(Box::new(JsAudioSink(callback)));
    }

    pub fn start(&mut self) -> bool {
        self.input(Input::Start)
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.input(Input::PauseToggle)
    }

    pub fn move_up(&mut self) -> bool {
        self.input(Input::MoveUp)
    }

    pub fn move_down(&mut self) -> bool {
        self.input(Input::MoveDown)
    }

    pub fn stop_move(&mut self) -> bool {
        self.input(Input::StopMove)
    }

    pub fn set_difficulty(&mut self, id: &str) -> bool {
        self.input(Input::SetDifficulty(id.to_string()))
    }

    pub fn reset(&mut self) -> bool {
        self.input(Input::Reset)
    }

    pub fn restart(&mut self) -> bool {
        self.input(Input::Restart)
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.game.audio_mut().set_muted(muted);
    }

    /// Master volume, clamped to 0.0 - 1.0
    pub fn set_volume(&mut self, volume: f32) {
        self.game.audio_mut().set_master_volume(volume);
    }

    /// Record a window resize; applied by `poll_resize` once the throttle
    /// window has passed
    pub fn resize(&mut self, width: f32, height: f32) {
        self.resize.offer(js_sys::Date::now(), width, height);
    }

    /// Apply a throttled resize if one is due. Returns true when applied.
    pub fn poll_resize(&mut self) -> bool {
        match self.resize.poll(js_sys::Date::now()) {
            Some((width, height)) => self.input(Input::Resize { width, height }),
            None => false,
        }
    }

    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// Animation frame callback. Returns true if another frame is wanted.
    pub fn frame(&mut self, timestamp_ms: f64) -> Result<bool, JsValue> {
        match self.game.on_frame(timestamp_ms, &mut self.frames) {
            Ok(FrameStatus::Ended(outcome)) => {
                log::info!("Final score {}:{}", outcome.score.left, outcome.score.right);
                Ok(self.frames.take())
            }
            Ok(_) => Ok(self.frames.take()),
            Err(err) => Err(JsValue::from_str(&err.to_string())),
        }
    }

    /// True when the game has asked for a frame the host has not delivered yet
    pub fn needs_frame(&self) -> bool {
        self.frames.is_requested()
    }

    /// Consume the frame request (hosts call `requestAnimationFrame` when true)
    pub fn take_frame_request(&mut self) -> bool {
        self.frames.take()
    }

    pub fn snapshot_json(&self) -> String {
        self.game.snapshot().to_json()
    }

    pub fn phase(&self) -> String {
        self.game.phase().as_str().to_string()
    }

    pub fn difficulty(&self) -> String {
        self.game.selected_difficulty().as_str().to_string()
    }
}

impl WebGame {
    fn input(&mut self, input: Input) -> bool {
        self.game.handle_input(input, &mut self.frames)
    }
}

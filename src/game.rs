//! Game loop driver
//!
//! `GameLoop` owns the simulation and is the only thing that mutates it. The
//! host calls [`GameLoop::handle_input`] for user events and
//! [`GameLoop::on_frame`] from its per-frame callback. Every frame re-checks
//! the state machine, so a callback that arrives after a pause or game over
//! does nothing and does not reschedule itself.

use crate::audio::{AudioManager, AudioSink, SoundEffect};
use crate::error::SimError;
use crate::platform::{FramePacer, FrameScheduler};
use crate::renderer::{RenderSink, Renderer, Snapshot};
use crate::settings::Settings;
use crate::sim::{
    Difficulty, Direction, GameEvent, GamePhase, GameState, MatchOutcome, Surface, tick,
};

/// Normalized input from the host
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Leave INIT, start a match from the menu, or continue a paused match
    Start,
    /// Pause while playing, resume while paused
    PauseToggle,
    MoveUp,
    MoveDown,
    StopMove,
    /// Select the difficulty for the next match (unknown ids are ignored)
    SetDifficulty(String),
    /// Surface size changed (already throttled by the host)
    Resize { width: f32, height: f32 },
    /// Back to the menu from pause or game over
    Reset,
    /// Reset and immediately start a new match ("play again")
    Restart,
}

/// What a frame callback did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Not playing: nothing simulated, nothing rescheduled
    Idle,
    /// Arrived before the next tick was due; rescheduled without simulating
    Skipped,
    /// One tick ran and the next frame was requested
    Ticked,
    /// The tick ended the match; nothing rescheduled
    Ended(MatchOutcome),
}

/// The loop driver
pub struct GameLoop {
    state: GameState,
    /// Difficulty the next match will use
    selected: Difficulty,
    pacer: FramePacer,
    renderer: Renderer,
    audio: AudioManager,
    /// A frame callback has been requested and not yet delivered
    frame_pending: bool,
}

impl GameLoop {
    /// Create a game in INIT with validated settings
    pub fn new(settings: Settings, surface: Surface, seed: u64) -> Result<Self, SimError> {
        settings.validate()?;
        settings.check_surface(surface.width, surface.height)?;
        log::info!("Game initialized with seed: {seed}");
        Ok(Self::from_state(GameState::new(settings, surface, seed)))
    }

    /// Drive an already-built simulation (e.g. one with an injected speed roll)
    pub fn from_state(state: GameState) -> Self {
        let settings = &state.settings;
        Self {
            selected: settings.difficulty,
            pacer: FramePacer::new(settings.fps),
            renderer: Renderer::default(),
            audio: AudioManager::new(None, settings.master_volume, settings.music),
            frame_pending: false,
            state,
        }
    }

    pub fn set_render_sink(&mut self, sink: Box<dyn RenderSink>) {
        self.renderer.set_sink(sink);
    }

    pub fn set_audio_sink(&mut self, sink: Box<dyn AudioSink>) {
        self.audio.set_sink(sink);
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.machine.phase()
    }

    pub fn selected_difficulty(&self) -> Difficulty {
        self.selected
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    /// INIT -> MENU, showing the start screen
    pub fn boot(&mut self) -> bool {
        if self.state.machine.phase() != GamePhase::Init {
            return false;
        }
        let ok = self.state.machine.transition(GameEvent::Start);
        if ok {
            log::info!("Pong ready ({}x{})", self.state.surface.width, self.state.surface.height);
            self.renderer.draw(&self.state);
        }
        ok
    }

    /// Apply one input event. Returns false when the event was rejected or
    /// ignored in the current phase.
    pub fn handle_input(&mut self, input: Input, scheduler: &mut dyn FrameScheduler) -> bool {
        match input {
            Input::Start => self.start(scheduler),
            Input::PauseToggle => self.toggle_pause(scheduler),
            Input::MoveUp => self.steer(Direction::Up),
            Input::MoveDown => self.steer(Direction::Down),
            Input::StopMove => {
                self.state.paddle_one.direction = Direction::None;
                true
            }
            Input::SetDifficulty(id) => self.select_difficulty(&id),
            Input::Resize { width, height } => self.resize(width, height),
            Input::Reset => self.reset(),
            Input::Restart => self.reset() && self.start(scheduler),
        }
    }

    /// Per-frame callback. Runs at most one tick.
    ///
    /// On a fatal simulation error the match is paused (so no further ticks
    /// run) and the error is returned. Resuming is refused from then on; only
    /// [`Input::Reset`] or [`Input::Restart`] recover.
    pub fn on_frame(
        &mut self,
        now_ms: f64,
        scheduler: &mut dyn FrameScheduler,
    ) -> Result<FrameStatus, SimError> {
        self.frame_pending = false;

        if !self.state.machine.is_playing() {
            return Ok(FrameStatus::Idle);
        }
        if !self.pacer.ready(now_ms) {
            self.schedule(scheduler);
            return Ok(FrameStatus::Skipped);
        }

        let events = match tick(&mut self.state) {
            Ok(events) => events,
            Err(err) => {
                log::error!("Simulation halted: {err}");
                self.state.machine.transition(GameEvent::Pause);
                self.audio.music(false);
                return Err(err);
            }
        };

        for effect in SoundEffect::for_tick(&events) {
            self.audio.play(effect);
        }
        self.renderer.draw(&self.state);

        if let Some(outcome) = events.outcome {
            log::info!(
                "Match over - {} ({}:{})",
                if outcome.player_won() { "player won" } else { "player lost" },
                outcome.score.left,
                outcome.score.right
            );
            self.audio.music(false);
            return Ok(FrameStatus::Ended(outcome));
        }

        self.schedule(scheduler);
        Ok(FrameStatus::Ticked)
    }

    /// Request a frame unless one is already on its way
    fn schedule(&mut self, scheduler: &mut dyn FrameScheduler) {
        if !self.frame_pending {
            self.frame_pending = true;
            scheduler.request_frame();
        }
    }

    fn start(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        match self.state.machine.phase() {
            GamePhase::Init => self.boot(),
            GamePhase::Menu => {
                self.state.new_match(self.selected);
                self.state.machine.transition(GameEvent::Start);
                log::info!(
                    "Match started ({} difficulty, first to {})",
                    self.selected.as_str(),
                    self.state.settings.score_to_win
                );
                self.begin_playing(scheduler);
                true
            }
            GamePhase::Paused => {
                if !self.resumable() {
                    return false;
                }
                self.state.machine.transition(GameEvent::Start);
                self.begin_playing(scheduler);
                true
            }
            GamePhase::Playing | GamePhase::GameOver => {
                log::debug!("Start ignored in {:?}", self.phase());
                false
            }
        }
    }

    fn toggle_pause(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        match self.state.machine.phase() {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => {
                if !self.resumable() {
                    return false;
                }
                let ok = self.state.machine.transition(GameEvent::Resume);
                if ok {
                    self.begin_playing(scheduler);
                }
                ok
            }
            phase => {
                log::debug!("Pause toggle ignored in {phase:?}");
                false
            }
        }
    }

    fn pause(&mut self) -> bool {
        let ok = self.state.machine.transition(GameEvent::Pause);
        if ok {
            log::info!("Paused");
            self.audio.music(false);
            self.renderer.draw(&self.state);
        }
        ok
    }

    /// A match halted by a non-finite value can only be restarted
    fn resumable(&self) -> bool {
        match self.state.check_finite() {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Cannot resume ({err}); restart the match");
                false
            }
        }
    }

    fn begin_playing(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.pacer.reset();
        self.audio.music(true);
        self.schedule(scheduler);
    }

    fn steer(&mut self, direction: Direction) -> bool {
        if self.state.machine.is_paused() {
            return false;
        }
        self.state.paddle_one.direction = direction;
        true
    }

    fn select_difficulty(&mut self, id: &str) -> bool {
        match Difficulty::from_id(id) {
            Some(difficulty) => {
                log::info!("Difficulty set to {}", difficulty.as_str());
                self.selected = difficulty;
                true
            }
            None => {
                log::debug!("Ignoring unknown difficulty {id:?}");
                false
            }
        }
    }

    fn resize(&mut self, width: f32, height: f32) -> bool {
        if let Err(err) = self.state.settings.check_surface(width, height) {
            log::warn!("Ignoring resize to {width}x{height}: {err}");
            return false;
        }

        if self.state.machine.is_playing() {
            self.pause();
        }
        self.state.resize(Surface::new(width, height));
        self.renderer.draw(&self.state);
        true
    }

    fn reset(&mut self) -> bool {
        let ok = self.state.machine.transition(GameEvent::Reset);
        if ok {
            self.state.new_match(self.selected);
            self.audio.music(false);
            self.renderer.draw(&self.state);
        }
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{FixedRoll, Score, Side};
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct CountingScheduler {
        requests: u32,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&mut self) {
            self.requests += 1;
        }
    }

    struct SoundLog(Rc<RefCell<Vec<SoundEffect>>>);

    impl AudioSink for SoundLog {
        fn play(&mut self, effect: SoundEffect, _volume: f32) {
            self.0.borrow_mut().push(effect);
        }
        fn set_music(&mut self, _playing: bool, _volume: f32) {}
    }

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn game() -> GameLoop {
        let state = GameState::with_speed_roll(
            Settings::default(),
            Surface::new(800.0, 600.0),
            Box::new(FixedRoll(0.0)),
        );
        GameLoop::from_state(state)
    }

    fn playing_game(sched: &mut CountingScheduler) -> GameLoop {
        let mut game = game();
        assert!(game.boot());
        assert!(game.handle_input(Input::Start, sched));
        assert_eq!(game.phase(), GamePhase::Playing);
        game
    }

    #[test]
    fn test_boot_and_start() {
        let mut sched = CountingScheduler::default();
        let mut game = game();
        assert_eq!(game.phase(), GamePhase::Init);

        assert!(game.handle_input(Input::Start, &mut sched));
        assert_eq!(game.phase(), GamePhase::Menu);
        assert_eq!(sched.requests, 0);

        assert!(game.handle_input(Input::Start, &mut sched));
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.state().ball.vel.y, 2.0);
        assert_eq!(sched.requests, 1);
    }

    #[test]
    fn test_new_rejects_bad_settings() {
        let settings = Settings {
            fps: 0,
            ..Default::default()
        };
        assert!(GameLoop::new(settings, Surface::new(800.0, 600.0), 1).is_err());
    }

    #[test]
    fn test_new_rejects_undersized_surface() {
        let err = GameLoop::new(Settings::default(), Surface::new(60.0, 50.0), 1)
            .err()
            .expect("surface too small");
        assert!(matches!(err, SimError::InvalidSetting { .. }));
        assert!(GameLoop::new(Settings::default(), Surface::new(f32::NAN, 600.0), 1).is_err());
    }

    #[test]
    fn test_smallest_surface_keeps_paddles_inside() {
        let settings = Settings::default();
        let (w, h) = settings.min_surface();
        let mut sched = CountingScheduler::default();
        let mut game = GameLoop::new(settings, Surface::new(w, h), 1).expect("minimum surface");
        game.boot();
        game.handle_input(Input::Start, &mut sched);

        let mut now = 0.0;
        for _ in 0..120 {
            game.handle_input(Input::MoveDown, &mut sched);
            game.on_frame(now, &mut sched).expect("frame");
            for paddle in [&game.state().paddle_one, &game.state().paddle_two] {
                assert!(paddle.y >= 0.0 && paddle.y <= h - paddle.height);
            }
            now += FRAME_MS;
        }
    }

    #[test]
    fn test_frame_ticks_and_reschedules() {
        let mut sched = CountingScheduler::default();
        let mut game = playing_game(&mut sched);
        let x = game.state().ball.pos.x;

        assert_eq!(game.on_frame(0.0, &mut sched), Ok(FrameStatus::Ticked));
        assert_eq!(game.state().ball.pos.x, x + 8.0);
        assert_eq!(game.state().time_ticks, 1);
        assert_eq!(sched.requests, 2);
    }

    #[test]
    fn test_early_frame_is_skipped() {
        let mut sched = CountingScheduler::default();
        let mut game = playing_game(&mut sched);
        assert_eq!(game.on_frame(0.0, &mut sched), Ok(FrameStatus::Ticked));
        assert_eq!(game.on_frame(5.0, &mut sched), Ok(FrameStatus::Skipped));
        assert_eq!(game.state().time_ticks, 1);
        assert_eq!(game.on_frame(FRAME_MS, &mut sched), Ok(FrameStatus::Ticked));
        assert_eq!(game.state().time_ticks, 2);
    }

    #[test]
    fn test_late_callback_after_pause_self_cancels() {
        let mut sched = CountingScheduler::default();
        let mut game = playing_game(&mut sched);
        assert!(game.handle_input(Input::PauseToggle, &mut sched));
        assert_eq!(game.phase(), GamePhase::Paused);

        let requests = sched.requests;
        let ball = game.state().ball;
        assert_eq!(game.on_frame(0.0, &mut sched), Ok(FrameStatus::Idle));
        assert_eq!(sched.requests, requests);
        assert_eq!(game.state().ball, ball);
    }

    #[test]
    fn test_pause_resume_does_not_duplicate_loop() {
        let mut sched = CountingScheduler::default();
        let mut game = playing_game(&mut sched);
        assert_eq!(sched.requests, 1);

        // Pause and resume before the pending frame arrives
        assert!(game.handle_input(Input::PauseToggle, &mut sched));
        assert!(game.handle_input(Input::PauseToggle, &mut sched));
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(sched.requests, 1);

        // Once the pending frame has been consumed, resuming asks again
        assert_eq!(game.on_frame(0.0, &mut sched), Ok(FrameStatus::Ticked));
        assert!(game.handle_input(Input::PauseToggle, &mut sched));
        assert_eq!(game.on_frame(FRAME_MS, &mut sched), Ok(FrameStatus::Idle));
        let before = sched.requests;
        assert!(game.handle_input(Input::Start, &mut sched));
        assert_eq!(sched.requests, before + 1);
    }

    #[test]
    fn test_pause_toggle_ignored_in_menu() {
        let mut sched = CountingScheduler::default();
        let mut game = game();
        game.boot();
        assert!(!game.handle_input(Input::PauseToggle, &mut sched));
        assert_eq!(game.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_moves_ignored_while_paused() {
        let mut sched = CountingScheduler::default();
        let mut game = playing_game(&mut sched);
        assert!(game.handle_input(Input::MoveUp, &mut sched));
        assert_eq!(game.state().paddle_one.direction, Direction::Up);
        assert!(game.handle_input(Input::StopMove, &mut sched));

        game.handle_input(Input::PauseToggle, &mut sched);
        assert!(!game.handle_input(Input::MoveDown, &mut sched));
        assert_eq!(game.state().paddle_one.direction, Direction::None);
    }

    #[test]
    fn test_difficulty_applies_to_next_match() {
        let mut sched = CountingScheduler::default();
        let mut game = playing_game(&mut sched);

        assert!(!game.handle_input(Input::SetDifficulty("impossible".into()), &mut sched));
        assert_eq!(game.selected_difficulty(), Difficulty::Normal);

        assert!(game.handle_input(Input::SetDifficulty("extreme".into()), &mut sched));
        assert_eq!(game.selected_difficulty(), Difficulty::Extreme);
        // In-flight match untouched
        assert_eq!(game.state().difficulty, Difficulty::Normal);

        game.handle_input(Input::PauseToggle, &mut sched);
        assert!(game.handle_input(Input::Restart, &mut sched));
        assert_eq!(game.state().difficulty, Difficulty::Extreme);
        assert_eq!(game.state().ball.vel.y, 4.0);
    }

    #[test]
    fn test_resize_mid_game_pauses() {
        let mut sched = CountingScheduler::default();
        let mut game = playing_game(&mut sched);
        game.on_frame(0.0, &mut sched).expect("frame");
        let vx = game.state().ball.vel.x;

        assert!(game.handle_input(
            Input::Resize {
                width: 1024.0,
                height: 768.0
            },
            &mut sched
        ));
        assert_eq!(game.phase(), GamePhase::Paused);
        assert_eq!(game.state().ball.pos, Vec2::new(512.0, 384.0));
        assert_eq!(game.state().ball.vel.x, -vx);
        assert_eq!(game.snapshot().width, 1024.0);
        assert_eq!(game.on_frame(FRAME_MS, &mut sched), Ok(FrameStatus::Idle));
    }

    #[test]
    fn test_resize_in_menu_stays_in_menu() {
        let mut sched = CountingScheduler::default();
        let mut game = game();
        game.boot();
        assert!(game.handle_input(
            Input::Resize {
                width: 640.0,
                height: 480.0
            },
            &mut sched
        ));
        assert_eq!(game.phase(), GamePhase::Menu);
        assert_eq!(sched.requests, 0);
    }

    #[test]
    fn test_tiny_resize_ignored() {
        let mut sched = CountingScheduler::default();
        let mut game = playing_game(&mut sched);
        assert!(!game.handle_input(
            Input::Resize {
                width: 50.0,
                height: 50.0
            },
            &mut sched
        ));
        assert!(!game.handle_input(
            Input::Resize {
                width: f32::NAN,
                height: 600.0
            },
            &mut sched
        ));
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.state().surface, Surface::new(800.0, 600.0));
    }

    #[test]
    fn test_winning_frame_ends_loop() {
        let mut sched = CountingScheduler::default();
        let mut game = playing_game(&mut sched);
        game.state.score = Score { left: 9, right: 0 };
        game.state.ball.pos = Vec2::new(795.0, 40.0);
        game.state.ball.vel = Vec2::new(8.0, 0.0);

        let requests = sched.requests;
        let status = game.on_frame(0.0, &mut sched).expect("frame");
        let FrameStatus::Ended(outcome) = status else {
            panic!("expected match end, got {status:?}");
        };
        assert_eq!(outcome.winner, Side::Left);
        assert_eq!(sched.requests, requests);
        assert_eq!(game.snapshot().player_won, Some(true));

        assert!(!game.handle_input(Input::Start, &mut sched));
        assert!(game.handle_input(Input::Restart, &mut sched));
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.state().score, Score::default());
        assert_eq!(game.snapshot().player_won, None);
    }

    #[test]
    fn test_reset_from_game_over_returns_to_menu() {
        let mut sched = CountingScheduler::default();
        let mut game = playing_game(&mut sched);
        game.state.score = Score { left: 0, right: 9 };
        game.state.ball.pos = Vec2::new(5.0, 40.0);
        game.state.ball.vel = Vec2::new(-8.0, 0.0);
        game.on_frame(0.0, &mut sched).expect("frame");
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.snapshot().player_won, Some(false));

        assert!(game.handle_input(Input::Reset, &mut sched));
        assert_eq!(game.phase(), GamePhase::Menu);
        assert_eq!(game.state().score, Score::default());
    }

    #[test]
    fn test_fatal_error_pauses_and_restart_recovers() {
        let mut sched = CountingScheduler::default();
        let mut game = playing_game(&mut sched);
        game.state.ball.vel = Vec2::new(f32::NAN, 0.0);

        let requests = sched.requests;
        assert!(matches!(
            game.on_frame(0.0, &mut sched),
            Err(SimError::NonFinite { .. })
        ));
        assert_eq!(game.phase(), GamePhase::Paused);
        assert_eq!(sched.requests, requests);

        // The corrupted match cannot be resumed
        assert!(!game.handle_input(Input::PauseToggle, &mut sched));
        assert!(!game.handle_input(Input::Start, &mut sched));
        assert_eq!(game.phase(), GamePhase::Paused);
        assert_eq!(sched.requests, requests);

        assert!(game.handle_input(Input::Restart, &mut sched));
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(game.state().check_finite().is_ok());
    }

    #[test]
    fn test_sounds_reach_sink() {
        let mut sched = CountingScheduler::default();
        let sounds = Rc::new(RefCell::new(Vec::new()));
        let mut game = playing_game(&mut sched);
        game.set_audio_sink(Box::new(SoundLog(sounds.clone())));
        game.state.ball.pos = Vec2::new(36.0, 300.0);
        game.state.ball.vel = Vec2::new(-8.0, 0.0);

        game.on_frame(0.0, &mut sched).expect("frame");
        assert_eq!(*sounds.borrow(), vec![SoundEffect::PaddleHit]);
    }

    #[test]
    fn test_end_to_end_opponent_tracks_ball() {
        let mut sched = CountingScheduler::default();
        let mut game = playing_game(&mut sched);
        let mut now = 0.0;

        for _ in 0..300 {
            let before = game.state().paddle_two.y;
            let step = game.state().paddle_two.speed;
            match game.on_frame(now, &mut sched).expect("frame") {
                FrameStatus::Ticked => {}
                other => panic!("unexpected {other:?}"),
            }
            let after = game.state().paddle_two.y;
            assert!((after - before).abs() <= step + 1e-4);
            now += FRAME_MS;
        }
    }
}

//! Platform abstraction layer
//!
//! What the core needs from its host:
//! - A per-frame callback (`FrameScheduler`)
//! - Frame pacing from host timestamps (`FramePacer`)
//! - Resize throttling (`ResizeThrottle`)
//! - Browser bindings (`web`, wasm32 only)

mod throttle;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use throttle::ResizeThrottle;

/// Host primitive: "invoke the frame callback once, on the next frame".
///
/// Requests are not queued; asking twice before the callback runs still
/// yields one callback.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Scheduler that just remembers whether a frame was requested.
///
/// Used by hosts that pull instead of being called back (the browser facade
/// returns the flag to JS, the native runner loops on it).
#[derive(Debug, Clone, Default)]
pub struct FrameRequest {
    requested: bool,
}

impl FrameRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request, if any
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.requested)
    }

    pub fn is_requested(&self) -> bool {
        self.requested
    }
}

impl FrameScheduler for FrameRequest {
    fn request_frame(&mut self) {
        self.requested = true;
    }
}

/// Decides whether a frame callback is due for a simulation tick.
///
/// Callbacks that arrive early (e.g. a 144 Hz display) are skipped. Late
/// callbacks still produce a single tick; there is no catch-up.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval_ms: f64,
    last_tick_ms: Option<f64>,
}

impl FramePacer {
    /// Small allowance so vsync jitter at exactly the target rate is not skipped
    const JITTER_MS: f64 = 1.0;

    pub fn new(fps: u32) -> Self {
        Self {
            interval_ms: 1000.0 / fps.max(1) as f64,
            last_tick_ms: None,
        }
    }

    /// Returns true (and records the time) if a tick should run at `now_ms`
    pub fn ready(&mut self, now_ms: f64) -> bool {
        let due = match self.last_tick_ms {
            None => true,
            // Clock went backwards (new timeline); accept and restart from here
            Some(last) if now_ms < last => true,
            Some(last) => now_ms - last + Self::JITTER_MS >= self.interval_ms,
        };
        if due {
            self.last_tick_ms = Some(now_ms);
        }
        due
    }

    /// Forget the last tick so the next callback runs immediately (after a
    /// pause the gap is not a reason to wait)
    pub fn reset(&mut self) {
        self.last_tick_ms = None;
    }
}

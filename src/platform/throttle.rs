//! Resize throttling
//!
//! A resize pauses the match and re-centres the ball, so it must not fire on
//! every step of a drag-resize. The first event opens a window; when the
//! window has elapsed the most recent size is delivered once.

/// Trailing-edge throttle for surface size changes
#[derive(Debug, Clone)]
pub struct ResizeThrottle {
    min_spacing_ms: f64,
    window_start_ms: Option<f64>,
    pending: Option<(f32, f32)>,
}

impl ResizeThrottle {
    pub fn new(min_spacing_ms: f64) -> Self {
        Self {
            min_spacing_ms: min_spacing_ms.max(0.0),
            window_start_ms: None,
            pending: None,
        }
    }

    /// Record a resize event. Later sizes in the same window replace earlier ones.
    pub fn offer(&mut self, now_ms: f64, width: f32, height: f32) {
        self.pending = Some((width, height));
        if self.window_start_ms.is_none() {
            self.window_start_ms = Some(now_ms);
        }
    }

    /// Size to deliver now, if the window has elapsed
    pub fn poll(&mut self, now_ms: f64) -> Option<(f32, f32)> {
        let start = self.window_start_ms?;
        if now_ms - start < self.min_spacing_ms {
            return None;
        }
        self.window_start_ms = None;
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
